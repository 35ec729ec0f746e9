// ABOUTME: JSON persistence for puzzle records.
// ABOUTME: Writes the dated output file plus a current.json mirror, creating the directory as needed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ScrapeError;
use crate::record::PuzzleRecord;

/// File name of the always-current mirror of the latest record.
pub const CURRENT_FILE: &str = "current.json";

/// Paths written by a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPaths {
    pub dated: PathBuf,
    pub current: PathBuf,
}

/// Write `record` to `dir` as `sudoku_<date>.json` plus an identical
/// `current.json`, creating the directory if absent.
///
/// Successive runs on the same date overwrite both files.
pub fn save_record(dir: &Path, record: &PuzzleRecord) -> Result<SavedPaths, ScrapeError> {
    fs::create_dir_all(dir)
        .map_err(|e| ScrapeError::store(dir.display().to_string(), "Save", Some(e.into())))?;

    let mut json = serde_json::to_string_pretty(record)
        .map_err(|e| ScrapeError::store(dir.display().to_string(), "Save", Some(e.into())))?;
    json.push('\n');

    let dated = dir.join(format!("sudoku_{}.json", record.date));
    write_file(&dated, &json)?;

    let current = dir.join(CURRENT_FILE);
    write_file(&current, &json)?;

    debug!(path = %dated.display(), "puzzle record saved");
    Ok(SavedPaths { dated, current })
}

fn write_file(path: &Path, contents: &str) -> Result<(), ScrapeError> {
    fs::write(path, contents)
        .map_err(|e| ScrapeError::store(path.display().to_string(), "Save", Some(e.into())))
}
