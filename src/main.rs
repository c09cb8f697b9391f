use clap::Parser;
use colored::*;
use moira::cli::{Cli, Commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging with MOIRA_LOG environment variable support
    let log_level = std::env::var("MOIRA_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<moira::MoiraError>() {
            Some(moira::MoiraError::Config(_)) => 2,
            Some(moira::MoiraError::Io(_)) => 3,
            Some(moira::MoiraError::Parse(_)) | Some(moira::MoiraError::Input(_)) => 4,
            Some(moira::MoiraError::Worker(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let num_threads = moira::utils::parallel::resolve_thread_count(cli.threads);

    // Initialize Rayon thread pool (used for parallel FASTA parsing)
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .expect("Failed to initialize thread pool");

    if cli.verbose > 0 {
        eprintln!("Using {} threads", num_threads);
    }

    match cli.command {
        Commands::Cluster(args) => moira::cli::commands::cluster::run(args, num_threads),
    }
}
