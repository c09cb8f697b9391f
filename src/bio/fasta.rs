use crate::bio::sequence::{Msa, Sequence};
use crate::{MoiraError, Result};
use flate2::read::GzDecoder;
use memmap2::Mmap;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{line_ending, not_line_ending},
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Files larger than this are parsed in parallel chunks.
const PARALLEL_THRESHOLD: usize = 8 * 1024 * 1024;
const PARALLEL_CHUNK_SIZE: usize = 1024 * 1024;

/// Parse a FASTA header line, keeping the id and dropping any description
fn parse_header(input: &[u8]) -> IResult<&[u8], &str> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, _) = opt(preceded(
        tag(b" "),
        map(not_line_ending, |s| std::str::from_utf8(s).unwrap_or("")),
    ))(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, id))
}

/// Parse sequence lines until next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;

        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Parse a single FASTA record
fn parse_record(input: &[u8]) -> IResult<&[u8], Sequence> {
    let (input, id) = parse_header(input)?;
    let (input, residues) = parse_sequence(input)?;
    Ok((input, Sequence::new(id.to_string(), residues)))
}

/// Parse all records from a byte buffer
fn parse_records(buffer: &[u8]) -> Result<Vec<Sequence>> {
    let mut input = buffer;
    let mut sequences = Vec::new();

    while !input.is_empty() {
        // Skip empty lines and whitespace
        while !input.is_empty() && input[0].is_ascii_whitespace() {
            input = &input[1..];
        }

        if input.is_empty() {
            break;
        }

        match parse_record(input) {
            Ok((remaining, seq)) => {
                if !seq.is_empty() {
                    sequences.push(seq);
                }
                input = remaining;
            }
            Err(e) => {
                return Err(MoiraError::Parse(format!("Failed to parse FASTA: {:?}", e)));
            }
        }
    }

    Ok(sequences)
}

/// Split a buffer at record boundaries for parallel parsing
fn chunk_boundaries(buffer: &[u8], chunk_size: usize) -> Vec<usize> {
    let mut boundaries = vec![0];
    for pos in 1..buffer.len() {
        if buffer[pos] == b'>'
            && buffer[pos - 1] == b'\n'
            && boundaries.last().is_some_and(|&last| pos - last >= chunk_size)
        {
            boundaries.push(pos);
        }
    }
    boundaries.push(buffer.len());
    boundaries
}

/// Parse a large buffer in parallel record-aligned chunks
fn parse_records_parallel(buffer: &[u8]) -> Result<Vec<Sequence>> {
    let boundaries = chunk_boundaries(buffer, PARALLEL_CHUNK_SIZE);

    let chunks: Result<Vec<Vec<Sequence>>> = boundaries
        .par_windows(2)
        .map(|window| parse_records(&buffer[window[0]..window[1]]))
        .collect();

    Ok(chunks?.into_iter().flatten().collect())
}

/// Read an aligned FASTA file into an `Msa` (supports .gz compression).
///
/// Sequences must all share one column count; ragged input is a parse error.
pub fn read_msa<P: AsRef<Path>>(path: P) -> Result<Msa> {
    let path = path.as_ref();

    let sequences = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let file = File::open(path)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut buffer = Vec::new();
        decoder.read_to_end(&mut buffer)?;
        parse_records(&buffer)?
    } else {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        if mmap.len() >= PARALLEL_THRESHOLD {
            parse_records_parallel(&mmap[..])?
        } else {
            parse_records(&mmap[..])?
        }
    };

    let mut msa = Msa::new();
    for seq in sequences {
        msa.insert(seq)?;
    }

    Ok(msa)
}
