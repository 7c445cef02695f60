use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::range::parse_date;
use crate::svg::Theme;

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG               Log filter (e.g., debug, repovista=trace)
    REPOVISTA_BASE_URL     Backend root URL
    REPOVISTA_TOP_N        Rows shown in top-N mode
";

/// Contributor statistics for a GitHub repository.
#[derive(Debug, Parser)]
#[command(name = "repovista", version, after_long_help = ENV_HELP)]
pub struct Cli {
    /// Repository in owner/repo form, e.g. vercel/next.js
    pub repo: String,

    /// Only show contributors whose name contains this text
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,

    /// Show every contributor instead of the top N
    #[arg(long, conflicts_with = "top")]
    pub all: bool,

    /// How many contributors to show (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub top: Option<u64>,

    /// SVG theme (overrides config)
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// Where to write the SVG card
    #[arg(short, long, default_value = "contributors.svg")]
    pub out: PathBuf,

    /// Print JSON to stdout instead of writing the card
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
