use std::path::PathBuf;

use clap::{command, Parser};

use crate::config::models::MatchMode;

// ///////////// //
// CLI interface //
// ///////////// //

/// catpig - CAT Printer Information Generator. Get status of CUPS printers and jobs, send test prints, and cancel jobs with an email notice to the owner.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Substrings of printer names to look for.
    #[arg(value_name = "PRINTER")]
    pub printer: Vec<String>,

    /// Show printers which have alerts, and list them.
    #[arg(short, long)]
    pub alerts: bool,

    /// Show printers which have unfinished jobs, and list them.
    #[arg(short, long)]
    pub jobs: bool,

    /// Show detailed information for the selected printers.
    #[arg(short, long)]
    pub details: bool,

    /// Send a test page to the selected printers, after confirming.
    #[arg(short, long)]
    pub test: bool,

    /// Cancel the queued jobs on the selected printers, after confirming.
    #[arg(short, long)]
    pub kill: bool,

    /// Use the printer list from CUPS instead of the local *.printers files.
    #[arg(short, long)]
    pub cups: bool,

    /// Dump the aggregated status as JSON instead of the summary view.
    #[arg(long)]
    pub json: bool,

    /// Read settings from this file instead of ~/.catpig/config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Whether name filters must all match ("all") or any one of them ("any").
    /// Overrides the configured behavior.match_mode.
    #[arg(long, value_enum, value_name = "MODE")]
    pub match_mode: Option<MatchMode>,
}
