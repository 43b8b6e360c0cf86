//! JSON-lines reading and writing

use super::CorpusError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Read one JSON document per line.
///
/// Every line must parse; a malformed line fails the whole file with its
/// 1-based line number.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CorpusError> {
    let file = File::open(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut items = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let item = serde_json::from_str(&line).map_err(|source| CorpusError::MalformedLine {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        items.push(item);
    }

    Ok(items)
}

/// Write one JSON document per line, returning the number of lines written.
///
/// Non-ASCII text is written as-is.
pub fn write_jsonl<T: Serialize>(
    path: &Path,
    items: impl IntoIterator<Item = T>,
) -> Result<usize, CorpusError> {
    let write_err = |source: std::io::Error| CorpusError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    let mut count = 0;

    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n").map_err(write_err)?;
        count += 1;
    }

    writer.flush().map_err(write_err)?;
    Ok(count)
}
