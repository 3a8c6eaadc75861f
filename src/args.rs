use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dealer-watch")]
#[command(about = "Watches dealer inventory pages and emails the listing when it changes")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file (built-in dealer list if omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the pipeline once and exit
    #[arg(long)]
    pub once: bool,

    /// Override seconds between scheduled runs
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Override the snapshot file location
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Log the snapshot instead of sending email
    #[arg(long)]
    pub dry_run: bool,
}
