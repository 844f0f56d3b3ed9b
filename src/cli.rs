use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fleet-tables")]
#[command(version, about = "Maintain ship association tables and entity images")]
pub struct Cli {
    /// Config file (default: ./fleet-tables.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile the ship/weapon table with the ship and weapon tables
    Weapons {
        /// Ship table
        #[arg(long)]
        ships: Option<PathBuf>,

        /// Weapon reference table
        #[arg(long)]
        weapons: Option<PathBuf>,

        /// Ship/weapon table to update
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report changes without writing the output table
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the ship/defense table from the ship and defense tables
    Defenses {
        /// Ship table
        #[arg(long)]
        ships: Option<PathBuf>,

        /// Defense reference table
        #[arg(long)]
        defenses: Option<PathBuf>,

        /// Ship/defense table to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report changes without writing the output table
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download remote entity images as WebP and point the CSVs at them
    Images {
        /// Directory local image paths are relative to
        #[arg(long)]
        public_root: Option<PathBuf>,

        /// HTTP timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Print the effective configuration
    Config,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
