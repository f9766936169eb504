//! CLI module - Command-line interface definitions and handlers

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::{EncodingStrategy, HeaderStyle, RunConfig};
use crate::core::tokenizer::TokenModel;
use crate::flows::aggregate::CollectOptions;
use crate::flows::summary::SummaryFormat;

/// copycontent - flatten a project tree into one text file.
#[derive(Parser, Debug)]
#[command(name = "copycontent")]
#[command(
    author,
    version,
    about,
    long_about = r#"copycontent walks a project tree, skips paths listed in an ignore file,
and concatenates every remaining file into a single text artifact:

    File: <path>

    <content>

    ================================================================================

By convention the tool lives in a directory inside the project:

    <project>/                  scan root
      copycontent/              tool directory (--tool-dir)
        .copycontentignore      ignore patterns
        combined_output.txt     output

Every path can be overridden.

Examples:
    copycontent
    copycontent --root . --output /tmp/snapshot.txt
    copycontent list
    copycontent init
    copycontent --stats --stats-format json
"#
)]
pub struct Cli {
    /// Tool directory the conventional paths are derived from.
    #[arg(
        long,
        global = true,
        env = "COPYCONTENT_DIR",
        default_value = ".",
        value_name = "DIR",
        long_help = "Directory the tool treats as its own location (defaults to the current directory).\n\n\
The scan root defaults to its parent, the ignore file to DIR/.copycontentignore and the\n\
output to DIR/combined_output.txt."
    )]
    pub tool_dir: PathBuf,

    /// Directory to scan (default: parent of the tool directory).
    #[arg(long, global = true, env = "COPYCONTENT_ROOT", value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Ignore-pattern file (default: TOOL_DIR/.copycontentignore).
    #[arg(
        long,
        global = true,
        env = "COPYCONTENT_IGNORE_FILE",
        value_name = "FILE",
        long_help = "Ignore-pattern file. One pattern per line; blank lines and lines starting\n\
with '#' are skipped. A missing file is reported and the run continues without patterns."
    )]
    pub ignore_file: Option<PathBuf>,

    /// Output file (default: TOOL_DIR/combined_output.txt).
    #[arg(
        short,
        long,
        global = true,
        env = "COPYCONTENT_OUTPUT",
        value_name = "FILE"
    )]
    pub output: Option<PathBuf>,

    /// Follow symbolic links while walking.
    #[arg(long, global = true)]
    pub follow_links: bool,

    /// How to handle invalid UTF-8 (lossy/strict).
    #[arg(
        long,
        global = true,
        default_value = "lossy",
        value_parser = ["lossy", "strict"],
        value_name = "MODE",
        long_help = "How to handle files that are not valid UTF-8.\n\n\
Supported values:\n\
- lossy (default): drop invalid byte sequences and keep the rest\n\
- strict: skip the file and report it as an error"
    )]
    pub encoding: String,

    /// Skip files larger than this many bytes.
    #[arg(long, global = true, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Write root-relative paths in file headers instead of absolute ones.
    #[arg(
        long,
        global = true,
        long_help = "Write forward-slash paths relative to the scan root in each 'File:' header.\n\n\
Useful when the output is compared across machines or checked in."
    )]
    pub relative_headers: bool,

    /// Print a run report (files, size, tokens, digest).
    #[arg(long, global = true)]
    pub stats: bool,

    /// Report format (text/json).
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_parser = ["text", "json"],
        value_name = "FORMAT",
        long_help = "Select the run report format.\n\n\
- text (default): human-readable, on stderr\n\
- json: one JSON object, on stdout"
    )]
    pub stats_format: String,

    /// Token model for the report (cl100k/o200k/approx).
    #[arg(long, global = true, default_value = "cl100k", value_name = "MODEL")]
    pub token_model: String,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug details (every ignore decision, every file read).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Commands {
    /// Write the combined output (default when no command is given).
    Collect,

    /// Print the files that would be included, one per line, without writing output.
    #[command(
        long_about = "Walk ROOT with the ignore rules applied and print each included path\n\
relative to ROOT, in output order. The output file is not touched.\n\n\
Example:\n\
  copycontent list\n"
    )]
    List,

    /// Write a starter ignore file.
    #[command(
        long_about = "Write a commented starter ignore file to the ignore-file location\n\
(TOOL_DIR/.copycontentignore unless --ignore-file is given).\n\n\
Example:\n\
  copycontent init --force\n"
    )]
    Init {
        /// Overwrite an existing ignore file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Resolve conventions and overrides into one configuration
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = RunConfig::from_tool_dir(&self.tool_dir);

        if let Some(root) = &self.root {
            config = config.with_root(root);
        }
        if let Some(ignore_file) = &self.ignore_file {
            config = config.with_ignore_file(ignore_file);
        }
        if let Some(output) = &self.output {
            config = config.with_output(output);
        }

        config.follow_links = self.follow_links;
        config.encoding = self
            .encoding
            .parse::<EncodingStrategy>()
            .map_err(|e| anyhow!(e))?;
        config.max_file_size = self.max_file_size;
        config.header_style = if self.relative_headers {
            HeaderStyle::Relative
        } else {
            HeaderStyle::Absolute
        };

        Ok(config)
    }

    pub fn collect_options(&self) -> Result<CollectOptions> {
        Ok(CollectOptions {
            stats: self.stats,
            stats_format: self
                .stats_format
                .parse::<SummaryFormat>()
                .map_err(|e| anyhow!(e))?,
            token_model: self
                .token_model
                .parse::<TokenModel>()
                .map_err(|e| anyhow!(e))?,
            color: !self.no_color,
        })
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.run_config()?;

    match cli.command.unwrap_or(Commands::Collect) {
        Commands::Collect => {
            let opts = cli.collect_options()?;
            crate::flows::aggregate::run_collect(&config, opts)
        }
        Commands::List => crate::backends::walk::run_list(&config),
        Commands::Init { force } => crate::flows::init::run_init(&config.ignore_file, force),
    }
}
