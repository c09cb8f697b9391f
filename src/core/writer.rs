/// Cluster aggregation and serialization
use crate::core::resolver::RepresentativeSet;
use crate::core::worker::Assignment;
use crate::{MoiraError, Result};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Mapping from representative to its assigned members, in arrival order.
///
/// Every representative owns exactly one entry from construction onward, so
/// unassigned representatives still appear in the output as singleton
/// clusters.
#[derive(Debug)]
pub struct ClusterMap {
    clusters: IndexMap<String, Vec<String>>,
}

impl ClusterMap {
    pub fn new(reps: &RepresentativeSet) -> Self {
        let clusters = reps
            .iter()
            .map(|rep| (rep.id.clone(), Vec::new()))
            .collect();
        Self { clusters }
    }

    /// Record one worker result. Unassigned genomes are counted by the
    /// caller but leave every cluster untouched.
    pub fn record(&mut self, assignment: &Assignment) -> Result<()> {
        let Some(rep_id) = &assignment.representative else {
            return Ok(());
        };

        let members = self.clusters.get_mut(rep_id).ok_or_else(|| {
            MoiraError::Worker(format!(
                "Genome {} assigned to unknown representative {}",
                assignment.genome_id, rep_id
            ))
        })?;
        members.push(assignment.genome_id.clone());

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Total number of genomes assigned to any representative.
    pub fn assigned_count(&self) -> usize {
        self.clusters.values().map(|members| members.len()).sum()
    }

    pub fn members(&self, rep_id: &str) -> Option<&[String]> {
        self.clusters.get(rep_id).map(|members| members.as_slice())
    }

    /// Representatives ordered by descending cluster size. The sort is
    /// stable, so equally sized clusters keep the representative set's
    /// sorted order.
    pub fn ranked(&self) -> Vec<(&str, &[String])> {
        let mut ranked: Vec<(&str, &[String])> = self
            .clusters
            .iter()
            .map(|(id, members)| (id.as_str(), members.as_slice()))
            .collect();
        ranked.sort_by_key(|(_, members)| std::cmp::Reverse(members.len()));
        ranked
    }

    /// Write one tab-separated line per representative: id, a 1-based
    /// `cluster_<rank>` label, the cluster size including the
    /// representative itself, and the comma-joined member ids.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for (rank, (rep_id, members)) in self.ranked().iter().enumerate() {
            writeln!(
                writer,
                "{}\tcluster_{}\t{}\t{}",
                rep_id,
                rank + 1,
                members.len() + 1,
                members.join(",")
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}
