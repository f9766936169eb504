//! Run report rendering
//!
//! Text goes to stderr so it never mixes with piped output; JSON goes to stdout.

use anyhow::Result;
use colored::Colorize;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::core::util::format_bytes;
use crate::flows::aggregate::AggregateReport;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "human" => Ok(SummaryFormat::Text),
            "json" => Ok(SummaryFormat::Json),
            _ => Err(format!("Unknown stats format: {}", s)),
        }
    }
}

pub struct SummaryRenderer {
    format: SummaryFormat,
    color: bool,
}

impl SummaryRenderer {
    pub fn new(format: SummaryFormat, color: bool) -> Self {
        Self { format, color }
    }

    pub fn render(&self, report: &AggregateReport) -> Result<String> {
        match self.format {
            SummaryFormat::Text => Ok(self.render_text(report)),
            SummaryFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }

    /// Render and print to the stream matching the format
    pub fn emit(&self, report: &AggregateReport) -> Result<()> {
        let rendered = self.render(report)?;
        match self.format {
            SummaryFormat::Text => eprint!("{}", rendered),
            SummaryFormat::Json => println!("{}", rendered),
        }
        Ok(())
    }

    fn render_text(&self, report: &AggregateReport) -> String {
        colored::control::set_override(self.color);

        let mut out = String::new();
        let _ = writeln!(out, "{}", "Combined output:".bold());
        let _ = writeln!(out, "   Output: {}", report.output);
        let _ = writeln!(
            out,
            "   Files: {}",
            report.files_written.to_string().green()
        );
        if report.files_lossy > 0 {
            let _ = writeln!(
                out,
                "   Lossy: {} (invalid UTF-8 dropped)",
                report.files_lossy.to_string().yellow()
            );
        }
        let _ = writeln!(out, "   Size: {}", format_bytes(report.bytes_written));
        if let (Some(tokens), Some(model)) = (report.tokens, report.token_model) {
            let _ = writeln!(out, "   Tokens: {} (model: {})", tokens, model);
        }
        let _ = writeln!(out, "   Digest: {}", report.digest);

        if !report.skipped.is_empty() {
            let _ = writeln!(
                out,
                "   {}: {}",
                "Skipped".red(),
                report.files_failed().to_string().red()
            );
            for skipped in &report.skipped {
                let _ = writeln!(
                    out,
                    "     - {} [{}] {}",
                    skipped.path, skipped.kind, skipped.message
                );
            }
        }

        out
    }
}
