//src/brite.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::ProgressBar;
use reqwest::blocking::Client;
use scraper::Html;

use crate::error::{FcError, Result};
use crate::io::{derived_output_path, read_lines, write_lines};
use crate::types::{BriteLevels, BriteRow};

/// KEGG REST `get` endpoint; the KO identifier is appended.
pub const DEFAULT_KEGG_URL: &str = "http://rest.kegg.jp/get/";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const OUTPUT_SUFFIX: &str = "_BRITEinfo.txt";

/// Marker chunk that opens the BRITE section of a KEGG entry.
const BRITE_MARKER: &str = "BRITE";

/// Anything that can classify a KO identifier into three BRITE levels.
pub trait BriteSource {
    fn fetch_classification(&self, key: &str) -> Result<BriteLevels>;
}

/// Blocking client for the KEGG REST service.
pub struct KeggRestClient {
    client: Client,
    base_url: String,
}

impl KeggRestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn fetch_page(&self, key: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, key);
        log::debug!("GET {url}");
        let body = self.client.get(&url).send()?.error_for_status()?.text()?;
        Ok(body)
    }
}

impl BriteSource for KeggRestClient {
    fn fetch_classification(&self, key: &str) -> Result<BriteLevels> {
        let page = self.fetch_page(key)?;
        parse_brite(key, &page_chunks(&page))
    }
}

/// Flattens a page (HTML or plain text) into non-empty chunks: each line is
/// trimmed and further split on double spaces.
pub fn page_chunks(page: &str) -> Vec<String> {
    let document = Html::parse_document(page);
    let text: String = document.root_element().text().collect();

    text.lines()
        .flat_map(|line| line.trim().split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}

/// Finds the BRITE marker, skips the hierarchy title after it, and takes
/// the next three chunks as the levels.
pub fn parse_brite(key: &str, chunks: &[String]) -> Result<BriteLevels> {
    let marker = chunks
        .iter()
        .position(|chunk| chunk == BRITE_MARKER)
        .ok_or_else(|| FcError::Lookup {
            key: key.to_string(),
            reason: "no BRITE section".to_string(),
        })?;

    match chunks.get(marker + 2..marker + 5) {
        Some([level1, level2, level3]) => Ok(BriteLevels {
            level1: level1.clone(),
            level2: level2.clone(),
            level3: level3.clone(),
        }),
        _ => Err(FcError::Lookup {
            key: key.to_string(),
            reason: "BRITE section has fewer than three levels".to_string(),
        }),
    }
}

/// Returns `(fc, ko)` for lines shaped `F…\tK…`, `None` for everything else.
pub fn lookup_key(line: &str) -> Option<(&str, &str)> {
    if !line.starts_with('F') {
        return None;
    }
    let mut parts = line.split('\t');
    let fc = parts.next()?;
    let key = parts.next()?;
    if key.starts_with('K') {
        Some((fc, key))
    } else {
        None
    }
}

/// Looks up every eligible line in order. The first failed lookup aborts.
pub fn annotate<S: BriteSource + ?Sized>(
    lines: &[String],
    source: &S,
    progress: &ProgressBar,
) -> Result<Vec<BriteRow>> {
    let mut rows = Vec::new();
    progress.set_length(lines.len() as u64);

    for line in lines {
        progress.inc(1);
        let Some((fc, key)) = lookup_key(line) else {
            continue;
        };
        progress.set_message(key.to_string());
        let levels = source.fetch_classification(key)?;
        rows.push(BriteRow {
            fc: fc.to_string(),
            key: key.to_string(),
            levels,
        });
    }

    progress.finish_and_clear();
    Ok(rows)
}

/// Annotates `input` and writes `<input name>_BRITEinfo.txt` into `out_dir`.
pub fn run<S: BriteSource + ?Sized>(
    input: &Path,
    out_dir: &Path,
    source: &S,
    progress: &ProgressBar,
) -> Result<(Vec<BriteRow>, PathBuf)> {
    let lines = read_lines(input)?;
    log::info!("Read {} KO lines from {}", lines.len(), input.display());

    let rows = annotate(&lines, source, progress)?;

    let out_path = derived_output_path(out_dir, input, OUTPUT_SUFFIX);
    let out_lines: Vec<String> = rows.iter().map(BriteRow::to_line).collect();
    write_lines(&out_path, &out_lines)?;
    log::info!("Wrote {} BRITE rows to {}", rows.len(), out_path.display());

    Ok((rows, out_path))
}
