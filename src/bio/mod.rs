pub mod aai;
pub mod fasta;
pub mod sequence;
pub mod taxonomy;

pub use sequence::{Msa, Sequence};
