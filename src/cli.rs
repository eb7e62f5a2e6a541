//! Command-line interface definitions for the retirement report.
//!
//! Every flag is optional. Anything left unset falls back to the YAML config
//! file given with `--config`, then to built-in defaults (see
//! [`crate::config::Settings`]).

use crate::outputs::Format;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the retirement report.
///
/// # Examples
///
/// ```sh
/// # Fetch the default retirements feed and write the HTML page here
/// retirement_feed_report
///
/// # All formats into ./report, from a saved feed, without the entity pass
/// retirement_feed_report --feed-file feed.xml -o ./report -f html -f csv -f json --no-ner
///
/// # Settings from a file, with a run log
/// retirement_feed_report -c report.yaml --log-file retirements.log
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, env = "RETIREMENT_REPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Feed URL; overrides the category-based default
    #[arg(long, env = "RETIREMENT_FEED_URL")]
    pub feed_url: Option<String>,

    /// Feed category used to build the default feed URL
    #[arg(long)]
    pub category: Option<String>,

    /// Read a saved RSS file instead of fetching the feed
    #[arg(long, conflicts_with = "feed_url")]
    pub feed_file: Option<PathBuf>,

    /// Directory the report files are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Base file name of the report files (without extension)
    #[arg(long)]
    pub report_name: Option<String>,

    /// Output format; repeat for several
    #[arg(short = 'f', long = "format", value_enum)]
    pub formats: Vec<Format>,

    /// Lexicon model for the entity pass, replacing the built-in one
    #[arg(long, env = "RETIREMENT_NER_MODEL")]
    pub ner_model: Option<PathBuf>,

    /// Skip the diagnostic entity pass
    #[arg(long, conflicts_with = "ner_model")]
    pub no_ner: bool,

    /// Drop entries whose link already appeared earlier in the feed
    #[arg(long)]
    pub dedupe: bool,

    /// Timeout for the feed request, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Retries for transient feed fetch failures
    #[arg(long)]
    pub max_retries: Option<usize>,

    /// Also write log events to this file
    #[arg(long, env = "RETIREMENT_REPORT_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}
