/// Shared fixture helpers for integration tests
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write a FASTA file from (id, aligned sequence) pairs.
pub fn write_fasta(path: &Path, records: &[(&str, String)]) {
    let mut file = File::create(path).expect("Failed to create FASTA fixture");
    for (id, residues) in records {
        writeln!(file, ">{}", id).expect("Failed to write FASTA fixture");
        writeln!(file, "{}", residues).expect("Failed to write FASTA fixture");
    }
}

/// Write a representative-id list, one id per line.
pub fn write_representatives(path: &Path, ids: &[&str]) {
    let mut file = File::create(path).expect("Failed to create representative fixture");
    writeln!(file, "# representative genomes").expect("Failed to write representative fixture");
    for id in ids {
        writeln!(file, "{}", id).expect("Failed to write representative fixture");
    }
}

/// Write a metadata table from (genome id, semicolon-separated taxonomy)
/// pairs. Pass an empty slice for a header-only file.
pub fn write_metadata(path: &Path, rows: &[(&str, &str)]) {
    let mut file = File::create(path).expect("Failed to create metadata fixture");
    writeln!(file, "genome_id\tcheckm_completeness\tncbi_taxonomy")
        .expect("Failed to write metadata fixture");
    for (id, taxonomy) in rows {
        writeln!(file, "{}\t99.0\t{}", id, taxonomy).expect("Failed to write metadata fixture");
    }
}

/// A gapless aligned sequence: `len` copies of `base` with substitutions at
/// the given positions.
pub fn seq_with(base: char, len: usize, subs: &[(usize, char)]) -> String {
    let mut residues: Vec<char> = std::iter::repeat(base).take(len).collect();
    for &(pos, sub) in subs {
        residues[pos] = sub;
    }
    residues.into_iter().collect()
}

/// Parse a written cluster file into (rep_id, label, size, members) rows.
pub fn read_clusters(path: &Path) -> Vec<(String, String, usize, Vec<String>)> {
    let contents = std::fs::read_to_string(path).expect("Failed to read cluster file");
    contents
        .lines()
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            assert_eq!(fields.len(), 4, "Malformed cluster line: {}", line);
            let members = if fields[3].is_empty() {
                Vec::new()
            } else {
                fields[3].split(',').map(|m| m.to_string()).collect()
            };
            (
                fields[0].to_string(),
                fields[1].to_string(),
                fields[2].parse().expect("Bad cluster size"),
                members,
            )
        })
        .collect()
}
