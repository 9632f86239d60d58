//src/matchfcs.rs

use std::io::BufRead;
use std::path::{Path, PathBuf};

use ahash::AHashMap;

use crate::error::{field, Result};
use crate::io::{derived_output_path, open_input, read_lines, write_lines};

pub const OUTPUT_SUFFIX: &str = "matchedFCs.txt";

pub const HEADER: &str = "HighRank\tLowRank\tGenome\tvariable\tvalue\tBrite2\tBrite3";

/// Appended when no annotation row carries the key.
pub const UNCHARACTERISED: &str = "Uncharacterised";

/// Annotation rows indexed by their first field. When a key repeats, the
/// earliest row wins.
#[derive(Debug, Default)]
pub struct AnnotationIndex {
    by_key: AHashMap<String, (String, String)>,
    rows: usize,
}

impl AnnotationIndex {
    /// Every row needs at least five tab fields; fields 4 and 5 are kept.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = AnnotationIndex::default();
        for line in lines {
            let line = line.as_ref();
            let fields: Vec<&str> = line.split('\t').collect();
            let brite2 = field(&fields, 3, line)?;
            let brite3 = field(&fields, 4, line)?;

            index.rows += 1;
            index
                .by_key
                .entry(fields[0].to_string())
                .or_insert_with(|| (brite2.to_string(), brite3.to_string()));
        }
        Ok(index)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, key: &str) -> Option<(&str, &str)> {
        self.by_key.get(key).map(|(a, b)| (a.as_str(), b.as_str()))
    }
}

/// Appends the two annotation columns for one genome line, keyed by its
/// fourth field with quotes removed.
pub fn annotate_line(line: &str, index: &AnnotationIndex) -> Result<String> {
    let fields: Vec<&str> = line.split('\t').collect();
    let key = field(&fields, 3, line)?.replace('"', "");

    let (brite2, brite3) = index.get(&key).unwrap_or((UNCHARACTERISED, UNCHARACTERISED));
    Ok(format!("{line}\t{brite2}\t{brite3}"))
}

/// Joins `genomes` against `annotations` and writes
/// `<genomes name>matchedFCs.txt` into `out_dir`.
pub fn run(genomes: &Path, annotations: &Path, out_dir: &Path) -> Result<(Vec<String>, PathBuf)> {
    let index = AnnotationIndex::from_lines(read_lines(annotations)?)?;
    log::info!("Read {} annotation rows from {}", index.rows(), annotations.display());

    let mut output = vec![HEADER.to_string()];
    let reader = open_input(genomes)?;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        output.push(annotate_line(line, &index)?);
    }
    log::info!("Completed {} clusters", output.len() - 1);

    let out_path = derived_output_path(out_dir, genomes, OUTPUT_SUFFIX);
    write_lines(&out_path, &output)?;

    Ok((output, out_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FcError;
    use std::fs;

    #[test]
    fn test_match_and_fallback() {
        let index = AnnotationIndex::from_lines(["KeyA\tx\ty\tBriteX\tBriteY"]).unwrap();

        let hit = annotate_line("Bacteria\tFirmicutes\tG1\t\"KeyA\"\t3", &index).unwrap();
        assert_eq!(hit, "Bacteria\tFirmicutes\tG1\t\"KeyA\"\t3\tBriteX\tBriteY");

        let miss = annotate_line("Bacteria\tFirmicutes\tG1\t\"KeyB\"\t0", &index).unwrap();
        assert_eq!(miss, "Bacteria\tFirmicutes\tG1\t\"KeyB\"\t0\tUncharacterised\tUncharacterised");
    }

    #[test]
    fn test_first_row_wins() {
        let index = AnnotationIndex::from_lines([
            "FC-1\tK1\tL1\tfirst2\tfirst3",
            "FC-1\tK1\tL1\tsecond2\tsecond3",
        ])
        .unwrap();
        assert_eq!(index.rows(), 2);
        assert_eq!(index.get("FC-1"), Some(("first2", "first3")));
    }

    #[test]
    fn test_empty_table_still_emits_one_row() {
        let index = AnnotationIndex::from_lines(Vec::<String>::new()).unwrap();
        let out = annotate_line("a\tb\tc\tFC-1", &index).unwrap();
        assert!(out.ends_with("\tUncharacterised\tUncharacterised"));
    }

    #[test]
    fn test_short_rows_are_errors() {
        assert!(matches!(
            AnnotationIndex::from_lines(["FC-1\tK1\tL1\tonly4"]),
            Err(FcError::MissingField { index: 4, .. })
        ));
        let index = AnnotationIndex::default();
        assert!(matches!(
            annotate_line("a\tb\tc", &index),
            Err(FcError::MissingField { index: 3, .. })
        ));
    }

    #[test]
    fn test_run_one_row_per_genome_line() {
        let dir = tempfile::tempdir().unwrap();
        let genomes = dir.path().join("long.tsv");
        let annotations = dir.path().join("brite.tsv");
        fs::write(&genomes, "H\tL\tG1\t\"FC-1\"\t1\nH\tL\tG2\t\"FC-2\"\t0\n").unwrap();
        fs::write(&annotations, "FC-1\tK00844\tM\tCarbohydrate\tGlycolysis\n").unwrap();

        let (output, out_path) = run(&genomes, &annotations, dir.path()).unwrap();
        assert_eq!(output.len(), 3);
        assert_eq!(out_path, dir.path().join("long.tsvmatchedFCs.txt"));
        assert_eq!(
            fs::read_to_string(out_path).unwrap(),
            format!(
                "{HEADER}\nH\tL\tG1\t\"FC-1\"\t1\tCarbohydrate\tGlycolysis\nH\tL\tG2\t\"FC-2\"\t0\tUncharacterised\tUncharacterised\n"
            )
        );
    }

    #[test]
    fn test_run_twice_gives_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let genomes = dir.path().join("long.tsv");
        let annotations = dir.path().join("brite.tsv");
        let genome_text: String = (0..50).map(|i| format!("H\tL\tG{}\t\"FC-{i}\"\t1\n", i % 3)).collect();
        let annotation_text: String = (0..50)
            .filter(|i| i % 4 != 0)
            .flat_map(|i| [format!("FC-{i}\tK\tM\tA{i}\tB{i}\n"), format!("FC-{i}\tK\tM\tdup\tdup\n")])
            .collect();
        fs::write(&genomes, genome_text).unwrap();
        fs::write(&annotations, annotation_text).unwrap();

        let out1 = dir.path().join("out1");
        let out2 = dir.path().join("out2");
        fs::create_dir(&out1).unwrap();
        fs::create_dir(&out2).unwrap();

        let (_, path1) = run(&genomes, &annotations, &out1).unwrap();
        let (_, path2) = run(&genomes, &annotations, &out2).unwrap();
        let first = fs::read_to_string(path1).unwrap();
        assert_eq!(first, fs::read_to_string(path2).unwrap());
        assert!(!first.contains("dup"));
    }
}
