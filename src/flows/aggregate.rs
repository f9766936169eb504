//! Aggregator - concatenate the selected files into one output artifact
//!
//! Each file becomes one record:
//!
//! ```text
//! File: <path>
//!
//! <content>
//!
//! ================================================================================
//!
//! ```
//!
//! A file that cannot be read is logged and skipped. Only a failure on the
//! output artifact itself stops the run.

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use tracing::{debug, error, info, warn};

use crate::backends::walk::{collect_files, report_files, FileEntry};
use crate::core::config::{HeaderStyle, RunConfig};
use crate::core::error::{CopyError, ReadErrorKind};
use crate::core::file_reader::{read_text, FileReadConfig};
use crate::core::patterns::IgnoreRules;
use crate::core::tokenizer::{count_tokens, TokenModel};
use crate::core::util::DigestWriter;
use crate::flows::summary::{SummaryFormat, SummaryRenderer};

/// Width of the separator rule between records
pub const SEPARATOR_WIDTH: usize = 80;

/// Character the separator rule is made of
pub const SEPARATOR_CHAR: char = '=';

/// A file left out of the output
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub kind: ReadErrorKind,
    pub message: String,
}

/// What a run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateReport {
    /// Output artifact path
    pub output: String,
    /// Files that made it into the output
    pub files_written: usize,
    /// Files whose invalid UTF-8 was dropped
    pub files_lossy: usize,
    /// Files that could not be read
    pub skipped: Vec<SkippedFile>,
    pub bytes_written: u64,
    /// xxh3 of the whole output
    pub digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_model: Option<TokenModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,
}

impl AggregateReport {
    pub fn files_failed(&self) -> usize {
        self.skipped.len()
    }
}

/// Build the record text for one file
pub fn render_record(header: &str, content: &str) -> String {
    let rule = SEPARATOR_CHAR.to_string().repeat(SEPARATOR_WIDTH);
    format!("File: {}\n\n{}\n\n{}\n\n", header, content, rule)
}

fn header_path(entry: &FileEntry, style: HeaderStyle) -> String {
    match style {
        HeaderStyle::Absolute => entry.path.display().to_string(),
        HeaderStyle::Relative => entry.relative.clone(),
    }
}

/// Write every readable file into the configured output, truncating it first.
///
/// When `token_model` is set, the report carries a token count for the output.
pub fn write_combined(
    files: &[FileEntry],
    config: &RunConfig,
    token_model: Option<TokenModel>,
) -> Result<AggregateReport, CopyError> {
    let output = &config.output;
    let create_err = |source| CopyError::OutputCreate {
        path: output.clone(),
        source,
    };
    let write_err = |source| CopyError::OutputWrite {
        path: output.clone(),
        source,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(create_err)?;
    }
    let file = File::create(output).map_err(create_err)?;
    let mut writer = DigestWriter::new(BufWriter::new(file));

    let read_config = FileReadConfig::from(config);
    let mut report = AggregateReport {
        output: output.display().to_string(),
        token_model,
        tokens: token_model.map(|_| 0),
        ..Default::default()
    };

    for entry in files {
        debug!("Reading file: {}", entry.path.display());

        let text = match read_text(&entry.path, &read_config) {
            Ok(text) => text,
            Err(e) => {
                match e.kind {
                    ReadErrorKind::TooLarge => {
                        warn!("Skipping oversized file: {}. {}", entry.path.display(), e)
                    }
                    _ => error!("Error reading file: {}. Error: {}", entry.path.display(), e),
                }
                report.skipped.push(SkippedFile {
                    path: entry.relative.clone(),
                    kind: e.kind,
                    message: e.message,
                });
                continue;
            }
        };

        if text.lossy {
            warn!(
                "Dropped invalid UTF-8 sequences from {}",
                entry.path.display()
            );
            report.files_lossy += 1;
        }

        let record = render_record(&header_path(entry, config.header_style), &text.content);
        writer.write_all(record.as_bytes()).map_err(write_err)?;

        if let (Some(model), Some(total)) = (token_model, report.tokens.as_mut()) {
            *total += count_tokens(&record, model);
        }
        report.files_written += 1;
    }

    writer.flush().map_err(write_err)?;
    report.bytes_written = writer.written();
    report.digest = writer.digest();

    info!(
        "All readable file contents have been written to {}.",
        output.display()
    );
    Ok(report)
}

/// Options for the collect command beyond the run configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    /// Print a run report
    pub stats: bool,
    pub stats_format: SummaryFormat,
    pub token_model: TokenModel,
    pub color: bool,
}

/// Run the collect command: load patterns, walk, aggregate, report
pub fn run_collect(config: &RunConfig, opts: CollectOptions) -> Result<()> {
    let rules = IgnoreRules::load(&config.ignore_file);
    if rules.is_empty() {
        info!("No ignore patterns in effect");
    }
    let files = collect_files(config, &rules)?;
    report_files(&files);

    let token_model = opts.stats.then_some(opts.token_model);
    let report = write_combined(&files, config, token_model)?;

    if opts.stats {
        let renderer = SummaryRenderer::new(opts.stats_format, opts.color);
        renderer.emit(&report)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EncodingStrategy;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn write_file(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn setup() -> (TempDir, RunConfig) {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("project")).unwrap();
        let config = RunConfig::from_tool_dir(&temp.path().join("tool"))
            .with_root(temp.path().join("project"))
            .with_output(temp.path().join("tool").join("combined_output.txt"));
        (temp, config)
    }

    fn run(config: &RunConfig) -> (AggregateReport, String) {
        let files = collect_files(config, &IgnoreRules::default()).unwrap();
        let report = write_combined(&files, config, None).unwrap();
        let output = fs::read_to_string(&config.output).unwrap();
        (report, output)
    }

    #[test]
    fn test_render_record() {
        let record = render_record("src/a.txt", "hello");
        let expected = format!("File: src/a.txt\n\nhello\n\n{}\n\n", "=".repeat(80));
        assert_eq!(record, expected);
    }

    #[test]
    fn test_header_and_separator_format() {
        let (temp, config) = setup();
        let project = temp.path().join("project");
        write_file(&project, "a.txt", b"hello");
        write_file(&project, "b.txt", b"world");

        let (report, output) = run(&config);
        let root = project.canonicalize().unwrap();
        let rule = "=".repeat(80);
        let expected = format!(
            "File: {}\n\nhello\n\n{rule}\n\nFile: {}\n\nworld\n\n{rule}\n\n",
            root.join("a.txt").display(),
            root.join("b.txt").display(),
        );

        assert_eq!(output, expected);
        assert_eq!(report.files_written, 2);
        assert_eq!(report.bytes_written, expected.len() as u64);
    }

    #[test]
    fn test_relative_headers() {
        let (temp, mut config) = setup();
        write_file(&temp.path().join("project"), "src/lib.rs", b"pub fn x() {}");
        config.header_style = HeaderStyle::Relative;

        let (_, output) = run(&config);
        assert!(output.starts_with("File: src/lib.rs\n\npub fn x() {}\n\n"));
    }

    #[test]
    fn test_output_is_truncated() {
        let (temp, config) = setup();
        write_file(&temp.path().join("project"), "a.txt", b"fresh");
        write_file(temp.path(), "tool/combined_output.txt", &[b'x'; 4096]);

        let (_, output) = run(&config);
        assert!(!output.contains("xxxx"));
        assert!(output.contains("fresh"));
    }

    #[test]
    fn test_idempotent_output() {
        let (temp, config) = setup();
        let project = temp.path().join("project");
        write_file(&project, "z.md", b"# z");
        write_file(&project, "src/a.rs", b"fn a() {}");
        write_file(&project, "src/b/c.rs", b"fn c() {}");

        let (first_report, first) = run(&config);
        let (second_report, second) = run(&config);
        assert_eq!(first, second);
        assert_eq!(first_report.digest, second_report.digest);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let (temp, mut config) = setup();
        let project = temp.path().join("project");
        write_file(&project, "a.txt", b"first");
        write_file(&project, "b.bin", &[0x66, 0x6F, 0xFF, 0x6F]);
        write_file(&project, "c.txt", b"last");
        config.encoding = EncodingStrategy::Strict;
        config.header_style = HeaderStyle::Relative;

        let (report, output) = run(&config);

        assert_eq!(report.files_written, 2);
        assert_eq!(report.files_failed(), 1);
        assert_eq!(report.skipped[0].path, "b.bin");
        assert_eq!(report.skipped[0].kind, ReadErrorKind::InvalidUtf8);

        let first = output.find("first").unwrap();
        let last = output.find("last").unwrap();
        assert!(first < last);
        assert!(!output.contains("b.bin"));
    }

    #[test]
    fn test_lossy_file_keeps_valid_text() {
        let (temp, config) = setup();
        write_file(&temp.path().join("project"), "mixed.txt", b"ab\xFFcd");

        let (report, output) = run(&config);
        assert_eq!(report.files_lossy, 1);
        assert!(output.contains("\n\nabcd\n\n"));
    }

    #[test]
    fn test_vanished_file_is_skipped() {
        let (temp, config) = setup();
        let project = temp.path().join("project");
        write_file(&project, "gone.txt", b"gone");
        write_file(&project, "kept.txt", b"kept");

        let files = collect_files(&config, &IgnoreRules::default()).unwrap();
        fs::remove_file(project.join("gone.txt")).unwrap();

        let report = write_combined(&files, &config, None).unwrap();
        assert_eq!(report.files_written, 1);
        assert_eq!(report.skipped[0].kind, ReadErrorKind::Io);
    }

    #[test]
    fn test_output_create_failure_is_fatal() {
        let (temp, config) = setup();
        write_file(&temp.path().join("project"), "a.txt", b"a");
        let config = config.with_output(temp.path().join("project"));

        let files = collect_files(&config, &IgnoreRules::default()).unwrap();
        let err = write_combined(&files, &config, None).unwrap_err();
        assert!(matches!(err, CopyError::OutputCreate { .. }));
    }

    #[test]
    fn test_token_count_when_requested() {
        let (temp, config) = setup();
        write_file(&temp.path().join("project"), "a.txt", b"hello world");

        let files = collect_files(&config, &IgnoreRules::default()).unwrap();
        let report = write_combined(&files, &config, Some(TokenModel::Approx)).unwrap();
        assert_eq!(report.token_model, Some(TokenModel::Approx));
        assert!(report.tokens.unwrap() > 0);

        let report = write_combined(&files, &config, None).unwrap();
        assert!(report.tokens.is_none());
    }
}
