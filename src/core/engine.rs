/// Orchestrates one clustering run: input loading, the worker pool, result
/// aggregation, and output
use crate::bio::{fasta, taxonomy};
use crate::core::genus_index::GenusIndex;
use crate::core::resolver::RepresentativeSet;
use crate::core::worker::{self, WorkerContext};
use crate::core::writer::ClusterMap;
use crate::utils::parallel;
use crate::{MoiraError, Result};
use crossbeam::channel;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

type ProgressCallback = Box<dyn Fn(&str, f64) + Send + Sync>;

/// Parallel AAI clustering engine.
///
/// Genomes are preferentially assigned to representatives from public
/// collections and only then by AAI, so a genome does not necessarily end
/// up with the representative it is most similar to.
pub struct ClusterEngine {
    threads: usize,
    silent: bool,
    progress_callback: Option<ProgressCallback>,
}

impl ClusterEngine {
    pub fn new() -> Self {
        Self {
            threads: 0,
            silent: false,
            progress_callback: None,
        }
    }

    /// Worker threads to use (0 = all available).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, f64) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    /// Run one clustering pass and write the cluster file.
    ///
    /// Fails before any worker starts when the two MSAs disagree on
    /// sequence count, when a listed representative lacks sequence data,
    /// or when a representative id carries an unknown source prefix. The
    /// output file is only written once every candidate has a result.
    pub fn run(
        &self,
        rep_file: &Path,
        bac_msa_file: &Path,
        ar_msa_file: &Path,
        metadata_file: &Path,
        aai_threshold: f64,
        output_file: &Path,
    ) -> Result<ClusterMap> {
        if !(aai_threshold > 0.0 && aai_threshold <= 1.0) {
            return Err(MoiraError::Config(format!(
                "AAI threshold must be in (0, 1], got {}",
                aai_threshold
            )));
        }

        let bac_msa = fasta::read_msa(bac_msa_file)?;
        let ar_msa = fasta::read_msa(ar_msa_file)?;
        info!("Identified {} bacterial sequences in MSA", bac_msa.len());
        info!("Identified {} archaeal sequences in MSA", ar_msa.len());

        if bac_msa.len() != ar_msa.len() {
            return Err(MoiraError::Input(
                "Archaeal and bacterial MSA files do not contain the same number of sequences"
                    .to_string(),
            ));
        }

        let rep_ids = read_representative_ids(rep_file)?;
        for id in &rep_ids {
            if !bac_msa.contains(id) || !ar_msa.contains(id) {
                return Err(MoiraError::Input(format!(
                    "Representative genome {} has no sequence data",
                    id
                )));
            }
        }
        let reps = RepresentativeSet::new(rep_ids)?;
        info!("Identified {} representatives", reps.len());

        let genome_taxonomy = taxonomy::read_gtdb_taxonomy(metadata_file)?;
        let genus_index = GenusIndex::build(&genome_taxonomy, &reps);

        let candidates: Vec<String> = bac_msa
            .ids()
            .filter(|id| ar_msa.contains(id) && !reps.contains(id))
            .map(|id| id.to_string())
            .collect();

        info!(
            "Comparing {} genomes to {} representatives with threshold = {:.3}",
            candidates.len(),
            reps.len(),
            aai_threshold
        );

        let clusters = self.cluster(
            &reps,
            &genus_index,
            &bac_msa,
            &ar_msa,
            aai_threshold,
            &candidates,
        )?;

        clusters.write(output_file)?;

        Ok(clusters)
    }

    /// Fan candidates out over the worker pool and aggregate assignments.
    fn cluster(
        &self,
        reps: &RepresentativeSet,
        genus_index: &GenusIndex,
        bac_msa: &crate::bio::Msa,
        ar_msa: &crate::bio::Msa,
        aai_threshold: f64,
        candidates: &[String],
    ) -> Result<ClusterMap> {
        let threads = parallel::resolve_thread_count(self.threads);

        let ctx = WorkerContext {
            reps,
            genus_index,
            bac_msa,
            ar_msa,
            aai_threshold,
        };

        let (work_tx, work_rx) = channel::unbounded();
        for genome_id in candidates {
            work_tx
                .send(genome_id.as_str())
                .map_err(|_| MoiraError::Worker("Work channel closed early".to_string()))?;
        }
        // A closed, drained channel is the stop signal for every worker
        drop(work_tx);

        let (result_tx, result_rx) = channel::unbounded();
        let cancelled = AtomicBool::new(false);

        let progress = if self.silent {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(candidates.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} Clustering genomes")
                    .unwrap()
                    .progress_chars("##-"),
            );
            pb
        };

        let mut clusters = ClusterMap::new(reps);
        let mut processed = 0usize;

        let worker_results: Vec<Result<()>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    let work_rx = work_rx.clone();
                    let result_tx = result_tx.clone();
                    let ctx = &ctx;
                    let cancelled = &cancelled;
                    s.spawn(move || -> Result<()> {
                        for genome_id in work_rx.iter() {
                            if cancelled.load(Ordering::Relaxed) {
                                break;
                            }
                            let assignment = match worker::assign_genome(ctx, genome_id) {
                                Ok(assignment) => assignment,
                                Err(e) => {
                                    // Fail fast: stop the other workers too
                                    cancelled.store(true, Ordering::Relaxed);
                                    return Err(e);
                                }
                            };
                            if result_tx.send(assignment).is_err() {
                                break;
                            }
                        }
                        Ok(())
                    })
                })
                .collect();

            // Workers hold the remaining senders; aggregation below ends
            // once the last of them exits
            drop(result_tx);

            let mut record_error = None;
            for assignment in result_rx.iter() {
                processed += 1;
                progress.inc(1);
                if let Some(callback) = &self.progress_callback {
                    callback(
                        "Clustering genomes",
                        processed as f64 * 100.0 / candidates.len().max(1) as f64,
                    );
                }
                if let Err(e) = clusters.record(&assignment) {
                    cancelled.store(true, Ordering::Relaxed);
                    record_error = Some(e);
                    break;
                }
            }

            let mut results: Vec<Result<()>> = handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(_) => Err(MoiraError::Worker("Worker thread panicked".to_string())),
                })
                .collect();
            if let Some(e) = record_error {
                results.push(Err(e));
            }
            results
        });

        progress.finish();

        for result in worker_results {
            result?;
        }

        if processed != candidates.len() {
            return Err(MoiraError::Worker(format!(
                "Processed {} of {} genomes",
                processed,
                candidates.len()
            )));
        }

        Ok(clusters)
    }
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Read representative genome ids: first tab-separated column, one id per
/// line, `#` lines are comments.
fn read_representative_ids(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(id) = line.split('\t').next() {
            ids.push(id.trim_end().to_string());
        }
    }

    Ok(ids)
}
