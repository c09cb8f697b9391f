/// Representative identity, source priority, and the reassignment policy
use crate::{MoiraError, Result};
use std::collections::BTreeSet;

/// Repository a genome id was drawn from, encoded by its first character.
///
/// Genomes are preferentially assigned to representatives from public
/// collections, so the derived `Ord` doubles as the priority order:
/// `Reference < Secondary < User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    /// `R` prefix, public reference collection
    Reference,
    /// `G` prefix, public secondary collection
    Secondary,
    /// `U` prefix, user-submitted
    User,
}

impl Source {
    pub fn from_genome_id(id: &str) -> Option<Self> {
        match id.as_bytes().first()? {
            b'R' => Some(Self::Reference),
            b'G' => Some(Self::Secondary),
            b'U' => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representative {
    pub id: String,
    pub source: Source,
}

/// The set of cluster anchors, fixed for the duration of one run.
///
/// Representatives are held sorted by id so every scan visits them in one
/// documented order, making first-seen tie-breaks reproducible across runs.
#[derive(Debug, Clone)]
pub struct RepresentativeSet {
    reps: Vec<Representative>,
}

impl RepresentativeSet {
    pub fn new<I>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        // BTreeSet dedupes and yields sorted order
        let unique: BTreeSet<String> = ids.into_iter().collect();

        let mut reps = Vec::with_capacity(unique.len());
        for id in unique {
            let source = Source::from_genome_id(&id).ok_or_else(|| {
                MoiraError::Input(format!(
                    "Representative genome {} has an unknown source prefix",
                    id
                ))
            })?;
            reps.push(Representative { id, source });
        }

        Ok(Self { reps })
    }

    pub fn len(&self) -> usize {
        self.reps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    pub fn get(&self, index: usize) -> &Representative {
        &self.reps[index]
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.reps.binary_search_by(|rep| rep.id.as_str().cmp(id)).ok()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Representative> {
        self.reps.iter()
    }
}

/// Decide between the current representative assignment and a challenger.
///
/// Source priority dominates: a challenger from a preferred repository wins
/// regardless of mismatch counts. Within one source the strictly lower
/// mismatch count wins; full ties retain the incumbent. Returns the winner
/// and the mismatch budget to carry forward (the challenger's count when it
/// wins, `current_budget` otherwise).
pub fn reassign<'a>(
    current: Option<&'a Representative>,
    current_budget: f64,
    challenger: &'a Representative,
    challenger_mismatches: u32,
) -> (&'a Representative, f64) {
    let Some(current_rep) = current else {
        // no currently assigned representative
        return (challenger, f64::from(challenger_mismatches));
    };

    if challenger.source < current_rep.source {
        return (challenger, f64::from(challenger_mismatches));
    }

    if challenger.source == current_rep.source
        && f64::from(challenger_mismatches) < current_budget
    {
        return (challenger, f64::from(challenger_mismatches));
    }

    (current_rep, current_budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep(id: &str) -> Representative {
        Representative {
            id: id.to_string(),
            source: Source::from_genome_id(id).unwrap(),
        }
    }

    #[test]
    fn test_source_priority_order() {
        assert!(Source::Reference < Source::Secondary);
        assert!(Source::Secondary < Source::User);
        assert_eq!(Source::from_genome_id("X_001"), None);
        assert_eq!(Source::from_genome_id(""), None);
    }

    #[test]
    fn test_first_comparison_always_wins() {
        let challenger = rep("U_001");
        let (winner, budget) = reassign(None, 42.5, &challenger, 7);
        assert_eq!(winner.id, "U_001");
        assert_eq!(budget, 7.0);
    }

    #[test]
    fn test_preferred_source_beats_better_aai() {
        // A reference representative with 5 mismatches displaces a
        // user-submitted one holding a perfect score
        let incumbent = rep("U_001");
        let challenger = rep("R_002");
        let (winner, budget) = reassign(Some(&incumbent), 0.0, &challenger, 5);
        assert_eq!(winner.id, "R_002");
        assert_eq!(budget, 5.0);
    }

    #[test]
    fn test_worse_source_never_wins() {
        let incumbent = rep("R_001");
        let challenger = rep("U_002");
        let (winner, budget) = reassign(Some(&incumbent), 5.0, &challenger, 0);
        assert_eq!(winner.id, "R_001");
        assert_eq!(budget, 5.0);
    }

    #[test]
    fn test_same_source_fewer_mismatches_wins() {
        let incumbent = rep("G_001");
        let challenger = rep("G_002");
        let (winner, budget) = reassign(Some(&incumbent), 5.0, &challenger, 3);
        assert_eq!(winner.id, "G_002");
        assert_eq!(budget, 3.0);
    }

    #[test]
    fn test_full_tie_retains_incumbent() {
        let incumbent = rep("G_001");
        let challenger = rep("G_002");
        let (winner, _) = reassign(Some(&incumbent), 3.0, &challenger, 3);
        assert_eq!(winner.id, "G_001");
    }

    #[test]
    fn test_set_is_sorted_and_deduplicated() {
        let set = RepresentativeSet::new(
            ["U_003", "R_001", "G_002", "R_001"]
                .iter()
                .map(|s| s.to_string()),
        )
        .unwrap();
        let ids: Vec<&str> = set.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["G_002", "R_001", "U_003"]);
        assert_eq!(set.position("R_001"), Some(1));
        assert!(!set.contains("R_999"));
    }

    #[test]
    fn test_unknown_prefix_is_rejected() {
        let result = RepresentativeSet::new(["X_001".to_string()]);
        assert!(result.is_err());
    }
}
