use crate::core::config::{self, Config};
use crate::core::engine::ClusterEngine;
use crate::MoiraError;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// File listing representative genome ids (first tab-separated column,
    /// '#' lines are comments)
    #[arg(short = 'r', long, value_name = "FILE")]
    pub representatives: PathBuf,

    /// Bacterial marker-gene MSA in FASTA format (.gz supported)
    #[arg(long, value_name = "FILE")]
    pub bac_msa: PathBuf,

    /// Archaeal marker-gene MSA in FASTA format (.gz supported)
    #[arg(long, value_name = "FILE")]
    pub ar_msa: PathBuf,

    /// Genome metadata table with an 'ncbi_taxonomy' column
    #[arg(short = 'm', long, value_name = "FILE")]
    pub metadata: PathBuf,

    /// Output cluster assignment file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: PathBuf,

    /// AAI threshold for assigning a genome to a representative
    /// (overrides the configuration file)
    #[arg(short = 't', long, value_name = "THRESHOLD")]
    pub aai_threshold: Option<f64>,

    /// Configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    pub quiet: bool,
}

pub fn run(args: ClusterArgs, num_threads: usize) -> anyhow::Result<()> {
    for path in [
        &args.representatives,
        &args.bac_msa,
        &args.ar_msa,
        &args.metadata,
    ] {
        if !path.exists() {
            return Err(MoiraError::Input(format!(
                "Input file does not exist: {}",
                path.display()
            ))
            .into());
        }
    }

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    let aai_threshold = args
        .aai_threshold
        .unwrap_or(config.clustering.aai_threshold);

    let engine = ClusterEngine::new()
        .with_threads(num_threads)
        .with_silent(args.quiet);

    let clusters = engine.run(
        &args.representatives,
        &args.bac_msa,
        &args.ar_msa,
        &args.metadata,
        aai_threshold,
        &args.output,
    )?;

    info!(
        "Assigned {} genomes across {} clusters",
        clusters.assigned_count(),
        clusters.len()
    );
    info!("Clustering information written to: {}", args.output.display());

    Ok(())
}
