//! Command-line argument parsing
//!
//! Flags override the values loaded from `config.yaml`.

use clap::Parser;
use mdlive_markdown::document::FrameSize;
use std::path::PathBuf;

/// Split-pane live markdown editor
#[derive(Parser, Debug, Default)]
#[command(
    name = "mdlive",
    version,
    about = "Live markdown editor with a split preview and print-to-PDF"
)]
pub struct CliArgs {
    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable GitHub-flavored tables, strikethrough and task lists
    #[arg(long)]
    pub no_gfm: bool,

    /// Show raw HTML as literal text instead of live markup
    #[arg(long)]
    pub no_raw_html: bool,

    /// Preview frame: a4, letter or full
    #[arg(long, value_name = "SIZE")]
    pub frame: Option<FrameSize>,

    /// Initial editor share of the split, in percent (20..=80)
    #[arg(long, value_name = "N")]
    pub ratio: Option<f64>,

    /// Start with an empty document instead of the sample
    #[arg(short = 'e', long)]
    pub empty: bool,

    /// Directory for generated print documents
    #[arg(long, value_name = "DIR")]
    pub print_dir: Option<PathBuf>,
}
