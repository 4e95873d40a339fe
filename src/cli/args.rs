use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    version,
    about = "Coping toolkit, check-ins, journal and bookmarks for ADHD and perimenopause"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Path to the data file of the local wellness store
    #[clap(long, value_parser)]
    pub data_file: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the wellkeep application
    #[clap(subcommand)]
    pub command: Commands,
}
