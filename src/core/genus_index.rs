/// Genus lookup used to prioritize likely representative matches
use crate::bio::taxonomy;
use crate::core::resolver::RepresentativeSet;
use std::collections::HashMap;

/// Read-only index from genome to genus and from genus to the
/// representatives sharing it. Built once per run before any worker starts.
#[derive(Debug, Default)]
pub struct GenusIndex {
    genus_of: HashMap<String, String>,
    reps_by_genus: HashMap<String, Vec<usize>>,
}

impl GenusIndex {
    pub fn build(
        taxonomy: &HashMap<String, Vec<String>>,
        reps: &RepresentativeSet,
    ) -> Self {
        let mut genus_of = HashMap::new();
        let mut reps_by_genus: HashMap<String, Vec<usize>> = HashMap::new();

        for (genome_id, ranks) in taxonomy {
            let Some(genus) = taxonomy::genus(ranks) else {
                continue;
            };

            genus_of.insert(genome_id.clone(), genus.to_string());

            if let Some(rep_index) = reps.position(genome_id) {
                reps_by_genus
                    .entry(genus.to_string())
                    .or_default()
                    .push(rep_index);
            }
        }

        // Taxonomy maps iterate in arbitrary order; buckets must follow the
        // representative set's sorted order
        for bucket in reps_by_genus.values_mut() {
            bucket.sort_unstable();
        }

        Self {
            genus_of,
            reps_by_genus,
        }
    }

    pub fn genus_of(&self, genome_id: &str) -> Option<&str> {
        self.genus_of.get(genome_id).map(|g| g.as_str())
    }

    /// Representatives sharing `genome_id`'s genus; empty when the genome
    /// has no genus entry or the genus holds no representatives.
    pub fn bucket_for(&self, genome_id: &str) -> &[usize] {
        self.genus_of(genome_id)
            .and_then(|genus| self.reps_by_genus.get(genus))
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }
}
