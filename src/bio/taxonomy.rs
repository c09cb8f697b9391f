/// GTDB-style taxonomy metadata: genome id -> ordered rank list
use crate::{MoiraError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Column holding the taxonomy string in the metadata file.
const TAXONOMY_COLUMN: &str = "ncbi_taxonomy";

/// Rank index of the genus token within an ordered rank list
/// (domain, phylum, class, order, family, genus, species).
pub const GENUS_RANK: usize = 5;

/// Bare rank-prefix marker for an unnamed genus.
pub const GENUS_PREFIX: &str = "g__";

/// Extract the genus token from an ordered rank list.
///
/// Returns `None` when the record has fewer than six ranks or the genus
/// token is empty (the bare `g__` marker).
pub fn genus(ranks: &[String]) -> Option<&str> {
    let token = ranks.get(GENUS_RANK)?;
    if token.is_empty() || token == GENUS_PREFIX {
        return None;
    }
    Some(token)
}

/// Read taxonomy metadata: a tab-separated table whose header names a
/// `ncbi_taxonomy` column holding semicolon-separated rank lists.
///
/// Genomes without a usable taxonomy row are simply absent from the map.
pub fn read_gtdb_taxonomy<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Vec<String>>> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| MoiraError::Parse("Empty taxonomy metadata file".to_string()))?;

    let taxonomy_col = header
        .split('\t')
        .position(|col| col == TAXONOMY_COLUMN)
        .ok_or_else(|| {
            MoiraError::Parse(format!(
                "Taxonomy metadata file has no '{}' column",
                TAXONOMY_COLUMN
            ))
        })?;

    let mut taxonomy = HashMap::new();
    for line in lines {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let Some(tax_str) = fields.get(taxonomy_col) else {
            continue;
        };
        if tax_str.is_empty() || *tax_str == "none" {
            continue;
        }

        let ranks: Vec<String> = tax_str.split(';').map(|r| r.trim().to_string()).collect();
        taxonomy.insert(fields[0].to_string(), ranks);
    }

    Ok(taxonomy)
}
