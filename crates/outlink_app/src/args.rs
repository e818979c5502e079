use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
/// Fetches pages and prints the crawlable outlinks of each as JSON lines.
pub struct Args {
    /// RON file with setting overrides.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only print outlinks matching this regular expression (whole link).
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Also write the log to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Pages to extract. Read from stdin, one per line, when empty.
    pub urls: Vec<String>,
}
