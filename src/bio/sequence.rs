use indexmap::IndexMap;

use crate::{MoiraError, Result};

/// Gap symbol used in aligned marker-gene sequences.
pub const GAP: u8 = b'-';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub residues: Vec<u8>,
}

impl Sequence {
    pub fn new(id: String, residues: Vec<u8>) -> Self {
        Self { id, residues }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Number of aligned columns holding a residue rather than a gap.
    pub fn residue_count(&self) -> usize {
        self.residues.iter().filter(|&&c| c != GAP).count()
    }
}

/// A multiple sequence alignment keyed by genome id.
///
/// Insertion order is preserved so downstream iteration is stable with
/// respect to the input file. All member sequences must share one column
/// count.
#[derive(Debug, Clone, Default)]
pub struct Msa {
    sequences: IndexMap<String, Sequence>,
    columns: Option<usize>,
}

impl Msa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, seq: Sequence) -> Result<()> {
        match self.columns {
            None => self.columns = Some(seq.len()),
            Some(columns) if columns != seq.len() => {
                return Err(MoiraError::Parse(format!(
                    "Sequence {} has {} columns, expected {}",
                    seq.id,
                    seq.len(),
                    columns
                )));
            }
            Some(_) => {}
        }

        let id = seq.id.clone();
        if self.sequences.insert(id.clone(), seq).is_some() {
            return Err(MoiraError::Parse(format!(
                "Duplicate genome id in alignment: {}",
                id
            )));
        }

        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Sequence> {
        self.sequences.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sequences.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn columns(&self) -> usize {
        self.columns.unwrap_or(0)
    }
}
