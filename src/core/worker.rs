/// Per-candidate scan: find the best representative under the
/// source-priority and AAI policy
use crate::bio::aai;
use crate::bio::sequence::{Msa, Sequence};
use crate::core::genus_index::GenusIndex;
use crate::core::resolver::{reassign, Representative, RepresentativeSet};
use crate::{MoiraError, Result};
use std::collections::HashSet;

/// One clustering decision: `representative` is `None` when no
/// representative matched within the AAI threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub genome_id: String,
    pub representative: Option<String>,
}

/// Read-only state shared by every worker for the duration of one run.
pub struct WorkerContext<'a> {
    pub reps: &'a RepresentativeSet,
    pub genus_index: &'a GenusIndex,
    pub bac_msa: &'a Msa,
    pub ar_msa: &'a Msa,
    pub aai_threshold: f64,
}

impl<'a> WorkerContext<'a> {
    fn sequence(&self, msa: &'a Msa, genome_id: &str) -> Result<&'a Sequence> {
        msa.get(genome_id).ok_or_else(|| {
            MoiraError::Worker(format!("Genome {} has no sequence data", genome_id))
        })
    }
}

/// Assign one candidate genome to its best representative, or to none.
///
/// Representatives sharing the candidate's genus are scanned first; the
/// shrinking mismatch budgets prune most remaining comparisons. The
/// bacterial comparison is authoritative for a representative whenever it
/// completes within budget; the archaeal sequence is only consulted
/// otherwise.
pub fn assign_genome(ctx: &WorkerContext, genome_id: &str) -> Result<Assignment> {
    let genome_bac = ctx.sequence(ctx.bac_msa, genome_id)?;
    let genome_ar = ctx.sequence(ctx.ar_msa, genome_id)?;

    let mut bac_budget = aai::mismatch_budget(&genome_bac.residues, ctx.aai_threshold);
    let mut ar_budget = aai::mismatch_budget(&genome_ar.residues, ctx.aai_threshold);
    let mut assigned: Option<&Representative> = None;

    // Same-genus representatives are expected to contain the true best
    // match, shrinking the budgets before the full scan
    let bucket = ctx.genus_index.bucket_for(genome_id);
    let in_bucket: HashSet<usize> = bucket.iter().copied().collect();
    let scan_order = bucket
        .iter()
        .copied()
        .chain((0..ctx.reps.len()).filter(|index| !in_bucket.contains(index)));

    for rep_index in scan_order {
        let rep = ctx.reps.get(rep_index);
        let rep_bac = ctx.sequence(ctx.bac_msa, &rep.id)?;

        if let Some(m) = aai::mismatches(&rep_bac.residues, &genome_bac.residues, bac_budget) {
            let (winner, budget) = reassign(assigned, bac_budget, rep, m);
            assigned = Some(winner);
            bac_budget = budget;
        } else {
            let rep_ar = ctx.sequence(ctx.ar_msa, &rep.id)?;
            if let Some(m) = aai::mismatches(&rep_ar.residues, &genome_ar.residues, ar_budget) {
                let (winner, budget) = reassign(assigned, ar_budget, rep, m);
                assigned = Some(winner);
                ar_budget = budget;
            }
        }
    }

    Ok(Assignment {
        genome_id: genome_id.to_string(),
        representative: assigned.map(|rep| rep.id.clone()),
    })
}
