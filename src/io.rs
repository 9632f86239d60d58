//src/io.rs

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use flate2::read::MultiGzDecoder;

use crate::error::Result;

/// Opens a text input, wrapping it in a `MultiGzDecoder` when it ends in `.gz`.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let f = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(reader)
}

/// Reads every non-empty line, with trailing `\r`/`\n` removed.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let reader = open_input(path)?;
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

/// Reads the whole input into one string.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut reader = open_input(path)?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// Field separator of one delimited line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    /// Tab if the line has one, comma otherwise.
    pub fn sniff(line: &str) -> Self {
        if line.contains('\t') {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        }
    }

    fn as_byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }
}

/// Splits one line into unquoted fields using CSV quoting rules.
pub fn split_delimited(line: &str, delimiter: Delimiter) -> Result<Vec<String>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(line.as_bytes());

    match rdr.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

/// Reads non-empty lines as records, sniffing the delimiter line by line.
/// Each record is returned with the raw line it came from.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<(String, Vec<String>)>> {
    read_lines(path)?
        .into_iter()
        .map(|line| {
            let fields = split_delimited(&line, Delimiter::sniff(&line))?;
            Ok((line, fields))
        })
        .collect()
}

/// Writes `lines` to `path`, one per line, replacing any existing file.
pub fn write_lines<P: AsRef<Path>, S: AsRef<str>>(path: P, lines: &[S]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for line in lines {
        out.write_all(line.as_ref().as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// `<out_dir>/<file name of input><suffix>`.
pub fn derived_output_path(out_dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{stem}{suffix}"))
}
