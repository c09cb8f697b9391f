pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "moira",
    version,
    about = "Parallel AAI clustering of genomes against representative genomes",
    long_about = "Moira assigns candidate genomes to representative genomes by amino-acid \
                  identity over concatenated marker-gene alignments, preferring publicly \
                  available representatives when similarities tie."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign genomes to representatives by AAI over marker alignments
    Cluster(commands::cluster::ClusterArgs),
}
