//src/reshape.rs

use std::path::{Path, PathBuf};

use crate::clusters::ClusterTable;
use crate::error::{FcError, Result};
use crate::io::{read_lines, write_lines};
use crate::types::{GenomeProtein, MembershipRow};

pub const CLUSTER_PREFIX: &str = "FC-";

pub const OUTPUT_FILE: &str = "MCLtoReshape2input.txt";

pub const HEADER: &str = "Genome\tProtein\tFC";

/// Extracts (genome, protein) from a FASTA header such as
/// `>WP_0001 hexokinase [Escherichia coli]`.
///
/// Returns `Ok(None)` for lines that are not headers or carry no `[`.
pub fn parse_header(line: &str) -> Result<Option<GenomeProtein>> {
    let Some(rest) = line.strip_prefix('>') else {
        return Ok(None);
    };
    let Some(start) = line.rfind('[') else {
        return Ok(None);
    };
    let stop = match line.rfind(']') {
        Some(stop) if stop > start => stop,
        _ => return Err(FcError::MalformedHeader(line.to_string())),
    };

    let protein = rest.split(' ').next().unwrap_or("");
    Ok(Some(GenomeProtein {
        genome: line[start + 1..stop].to_string(),
        protein: protein.to_string(),
    }))
}

/// All (genome, protein) pairs in file order; duplicates are kept.
pub fn genome_proteins<I, S>(lines: I) -> Result<Vec<GenomeProtein>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pairs = Vec::new();
    for line in lines {
        if let Some(pair) = parse_header(line.as_ref())? {
            pairs.push(pair);
        }
    }
    Ok(pairs)
}

/// One row per (pair, cluster member equal to the pair's protein).
pub fn membership_rows(pairs: &[GenomeProtein], clusters: &ClusterTable) -> Vec<MembershipRow> {
    pairs
        .iter()
        .flat_map(|pair| {
            clusters.clusters_containing(&pair.protein).map(move |entry| MembershipRow {
                genome: pair.genome.clone(),
                protein: pair.protein.clone(),
                fc: entry.id.clone(),
            })
        })
        .collect()
}

/// Builds the long `Genome / Protein / FC` table and writes it into `out_dir`.
pub fn run(mcl: &Path, genomes: &Path, out_dir: &Path) -> Result<(Vec<MembershipRow>, PathBuf)> {
    let clusters = ClusterTable::from_lines(read_lines(mcl)?, CLUSTER_PREFIX);
    log::info!("Dictionary of {} functional clusters created", clusters.len());

    let pairs = genome_proteins(read_lines(genomes)?)?;
    log::info!("List of {} genome and protein IDs created", pairs.len());

    let rows = membership_rows(&pairs, &clusters);
    log::info!("Functional clusters sorted: {} rows", rows.len());

    let out_path = out_dir.join(OUTPUT_FILE);
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.to_string());
    lines.extend(rows.iter().map(MembershipRow::to_line));
    write_lines(&out_path, &lines)?;

    Ok((rows, out_path))
}
