//src/traits.rs

use std::path::{Path, PathBuf};

use ahash::AHashMap;

use crate::clusters::ClusterTable;
use crate::error::Result;
use crate::io::{read_lines, read_to_string, write_lines};
use crate::types::TraitRecord;

/// Number of FASTA files the resolved records are spread across.
pub const OUTPUT_PARTITIONS: usize = 24;

pub const CLUSTER_PREFIX: &str = "FC.";

/// One `>`-delimited chunk of a concatenated genome file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeChunk<'a> {
    /// First space-delimited token.
    pub key: &'a str,
    /// Everything after the last `]`, or the whole chunk if it has none.
    pub sequence: &'a str,
}

/// Splits genome text on `>` after newlines have been removed.
///
/// The header and its sequence lines therefore run together, and the
/// sequence is whatever follows the closing `]` of the organism tag.
pub fn split_genome_chunks(flat: &str) -> Vec<GenomeChunk<'_>> {
    flat.split('>')
        .map(|chunk| GenomeChunk {
            key: chunk.split(' ').next().unwrap_or(""),
            sequence: chunk.rsplit(']').next().unwrap_or(chunk),
        })
        .collect()
}

/// Removes line breaks so multi-line records become one string each.
pub fn flatten_genome(text: &str) -> String {
    text.chars().filter(|&c| c != '\n' && c != '\r').collect()
}

/// Resolves each cluster's representative against the genome chunks.
///
/// Every chunk whose key equals the representative yields a record, in
/// genome order, for clusters in table order.
pub fn resolve_sequences(clusters: &ClusterTable, chunks: &[GenomeChunk<'_>]) -> Vec<TraitRecord> {
    let mut by_key: AHashMap<&str, Vec<usize>> = AHashMap::new();
    for (idx, chunk) in chunks.iter().enumerate() {
        by_key.entry(chunk.key).or_default().push(idx);
    }

    let mut records = Vec::new();
    for entry in clusters.entries() {
        let reference = entry.reference();
        let Some(positions) = by_key.get(reference) else {
            continue;
        };
        for &idx in positions {
            records.push(TraitRecord {
                fc: entry.id.clone(),
                reference: reference.to_string(),
                sequence: chunks[idx].sequence.to_string(),
            });
        }
    }
    records
}

/// Splits `items` into `parts` contiguous slices whose sizes differ by at
/// most one; the larger slices come first. Some slices may be empty.
pub fn partition<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    let base = items.len() / parts;
    let extra = items.len() % parts;

    let mut slices = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        slices.push(&items[start..start + size]);
        start += size;
    }
    slices
}

pub fn partition_file_name(index: usize) -> String {
    format!("File_{index}_FCs_identified_AA_seqs.fa")
}

/// Resolves cluster representatives to sequences and writes
/// [`OUTPUT_PARTITIONS`] FASTA files into `out_dir`.
pub fn run(mcl: &Path, genomes: &Path, out_dir: &Path) -> Result<(Vec<TraitRecord>, Vec<PathBuf>)> {
    let clusters = ClusterTable::from_lines(read_lines(mcl)?, CLUSTER_PREFIX);
    log::info!("Read {} clusters from {}", clusters.len(), mcl.display());

    let flat = flatten_genome(&read_to_string(genomes)?);
    let chunks = split_genome_chunks(&flat);
    log::info!("Read {} genome chunks from {}", chunks.len(), genomes.display());

    let records = resolve_sequences(&clusters, &chunks);
    log::info!("Resolved {} cluster sequences", records.len());

    let mut paths = Vec::with_capacity(OUTPUT_PARTITIONS);
    for (i, part) in partition(&records, OUTPUT_PARTITIONS).into_iter().enumerate() {
        let path = out_dir.join(partition_file_name(i + 1));
        let lines: Vec<String> = part.iter().map(TraitRecord::to_fasta).collect();
        write_lines(&path, &lines)?;
        paths.push(path);
    }

    Ok((records, paths))
}
