//src/psiblast.rs

use std::path::{Path, PathBuf};

use crate::error::{field, FcError, Result};
use crate::io::{derived_output_path, read_records, write_lines};

/// Rows at or below this percent identity are dropped.
pub const SIMILARITY_THRESHOLD: f64 = 50.0;

pub const OUTPUT_SUFFIX: &str = "PSIBlastfiltered.txt";

/// Result of filtering a set of PSI-BLAST rows.
#[derive(Debug, Clone, Default)]
pub struct FilterSummary {
    /// Rows seen.
    pub total: usize,
    /// Rows kept (score > threshold).
    pub retained: usize,
    /// Query, subject and score of each kept row, tab-joined.
    pub lines: Vec<String>,
}

impl FilterSummary {
    pub fn skipped(&self) -> usize {
        self.total - self.retained
    }
}

/// Keeps rows whose third field is strictly greater than [`SIMILARITY_THRESHOLD`].
///
/// Each item is `(raw line, fields)`; the raw line is only used for error
/// messages. A missing or non-numeric third field is an error.
pub fn filter_hits<I>(rows: I) -> Result<FilterSummary>
where
    I: IntoIterator<Item = (String, Vec<String>)>,
{
    let mut summary = FilterSummary::default();

    for (line, fields) in rows {
        summary.total += 1;
        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        let score_str = field(&fields, 2, &line)?;
        let score: f64 = score_str.trim().parse().map_err(|_| FcError::InvalidScore {
            line: line.clone(),
            value: score_str.to_string(),
        })?;

        if score > SIMILARITY_THRESHOLD {
            summary.retained += 1;
            summary
                .lines
                .push(format!("{}\t{}\t{}", fields[0], fields[1], fields[2]));
        }
    }

    Ok(summary)
}

/// Filters `input` and writes `<input name>PSIBlastfiltered.txt` into `out_dir`.
pub fn run(input: &Path, out_dir: &Path) -> Result<(FilterSummary, PathBuf)> {
    let rows = read_records(input)?;
    log::info!("Read {} PSI-BLAST rows from {}", rows.len(), input.display());

    let summary = filter_hits(rows)?;

    println!("Original count of PSI-Blast sim scores:");
    println!("{}", summary.total);
    println!("Filtered count of only > 50% similarity:");
    println!("{}", summary.retained);

    let out_path = derived_output_path(out_dir, input, OUTPUT_SUFFIX);
    write_lines(&out_path, &summary.lines)?;
    log::info!("Wrote {} rows to {}", summary.retained, out_path.display());

    Ok((summary, out_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{split_delimited, Delimiter};
    use std::fs;

    fn row(line: &str) -> (String, Vec<String>) {
        let fields = split_delimited(line, Delimiter::sniff(line)).unwrap();
        (line.to_string(), fields)
    }

    #[test]
    fn test_filter_quoted_csv_rows() {
        let rows = vec![row("\"P1\",\"P2\",\"75.5\""), row("\"P1\",\"P2\",\"40.0\"")];
        let summary = filter_hits(rows).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.retained, 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.lines, vec!["P1\tP2\t75.5"]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let rows = vec![
            row("q\ts\t50.0\t120\t0.001"),
            row("q\ts\t50.01\t120\t0.001"),
        ];
        let summary = filter_hits(rows).unwrap();
        assert_eq!(summary.lines, vec!["q\ts\t50.01"]);
    }

    #[test]
    fn test_non_numeric_score_is_fatal() {
        let err = filter_hits(vec![row("q\ts\tN/A")]).unwrap_err();
        assert!(matches!(err, FcError::InvalidScore { .. }));
    }

    #[test]
    fn test_short_row_is_fatal() {
        let err = filter_hits(vec![row("q\ts")]).unwrap_err();
        assert!(matches!(err, FcError::MissingField { index: 2, .. }));
    }

    #[test]
    fn test_run_writes_named_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("hits.tsv");
        fs::write(&input, "a\tb\t99.0\nc\td\t10.0\n\ne\tf\t51\n").unwrap();

        let (summary, out_path) = run(&input, dir.path()).unwrap();
        assert_eq!(out_path, dir.path().join("hits.tsvPSIBlastfiltered.txt"));
        assert_eq!(summary.total, 3);
        assert_eq!(fs::read_to_string(out_path).unwrap(), "a\tb\t99.0\ne\tf\t51\n");
    }
}
