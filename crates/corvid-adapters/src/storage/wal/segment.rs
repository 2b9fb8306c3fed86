//! WAL segment file naming and discovery.
//!
//! Segments are named `wal-<NNNNNNNNNN>.seg` with a zero-padded,
//! monotonically increasing decimal id, so that lexical sort order equals
//! creation order (spec §4.3, "segment-filename scheme" open question).

use std::fs;
use std::path::{Path, PathBuf};

use corvid_common::utils::error::Result;

const PREFIX: &str = "wal-";
const SUFFIX: &str = ".seg";
const ID_WIDTH: usize = 10;

/// Returns the file name for segment `id`.
#[must_use]
pub fn file_name(id: u64) -> String {
    format!("{PREFIX}{id:0width$}{SUFFIX}", width = ID_WIDTH)
}

/// Returns the full path for segment `id` under `dir`.
#[must_use]
pub fn file_path(dir: &Path, id: u64) -> PathBuf {
    dir.join(file_name(id))
}

/// Parses a segment id out of a file name, if it matches the naming scheme.
#[must_use]
pub fn parse_id(file_name: &str) -> Option<u64> {
    file_name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?.parse().ok()
}

/// Lists every segment under `dir`, sorted by id ascending. Returns an
/// empty list if `dir` does not exist.
///
/// # Errors
/// Returns an I/O error if `dir` exists but cannot be read.
pub fn list_segments(dir: &Path) -> Result<Vec<u64>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut ids: Vec<u64> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| parse_id(&name))
        .collect();
    ids.sort_unstable();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_zero_padded() {
        assert_eq!(file_name(0), "wal-0000000000.seg");
        assert_eq!(file_name(42), "wal-0000000042.seg");
    }

    #[test]
    fn parse_id_round_trips_with_file_name() {
        assert_eq!(parse_id(&file_name(7)), Some(7));
        assert_eq!(parse_id("not-a-segment.txt"), None);
    }

    #[test]
    fn lexical_sort_matches_numeric_sort() {
        let mut names = vec![file_name(10), file_name(2), file_name(1)];
        names.sort();
        assert_eq!(names, vec![file_name(1), file_name(2), file_name(10)]);
    }

    #[test]
    fn list_segments_on_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(list_segments(&missing).unwrap().is_empty());
    }

    #[test]
    fn list_segments_sorts_by_id() {
        let dir = tempfile::tempdir().unwrap();
        for id in [3, 1, 2] {
            std::fs::write(file_path(dir.path(), id), b"").unwrap();
        }
        assert_eq!(list_segments(dir.path()).unwrap(), vec![1, 2, 3]);
    }
}
