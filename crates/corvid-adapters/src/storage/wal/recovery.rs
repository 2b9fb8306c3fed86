//! WAL replay for crash recovery.
//!
//! Recovery replays every entry directly in order — there is no
//! transaction grouping to resolve (see [`super::record`]). A corrupted or
//! truncated tail is recovery-stop, not a fatal error: the entry that
//! failed to validate, and everything after it in every later segment, is
//! discarded.

use super::log::WalPosition;
use super::{segment, WalRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Replays WAL segments from a starting position.
pub struct WalRecovery {
    dir: PathBuf,
}

impl WalRecovery {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns every record from `from` onward, stopping at the first
    /// invalid checksum or truncated entry.
    ///
    /// # Errors
    /// Returns an I/O error if a segment file cannot be opened or read.
    pub fn iter_from(&self, from: WalPosition) -> std::io::Result<Vec<WalRecord>> {
        let mut records = Vec::new();
        for segment_id in segment::list_segments(&self.dir).map_err(std::io::Error::other)? {
            if segment_id < from.segment_id {
                continue;
            }
            let start_offset = if segment_id == from.segment_id { from.offset } else { 0 };
            let path = segment::file_path(&self.dir, segment_id);
            let file = File::open(&path)?;
            let mut reader = BufReader::new(file);
            reader.seek_relative(start_offset as i64)?;

            loop {
                match read_record(&mut reader) {
                    Ok(Some(record)) => records.push(record),
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(segment = segment_id, error = %e, "wal recovery stopped at bad entry");
                        return Ok(records);
                    }
                }
            }
        }
        Ok(records)
    }
}

fn read_record(reader: &mut BufReader<File>) -> std::io::Result<Option<WalRecord>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut data = vec![0u8; len];
    reader.read_exact(&mut data).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "wal: truncated record body")
    })?;

    let mut checksum_buf = [0u8; 4];
    reader.read_exact(&mut checksum_buf).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "wal: truncated checksum")
    })?;
    let stored_checksum = u32::from_le_bytes(checksum_buf);
    let computed_checksum = crc32fast::hash(&data);
    if stored_checksum != computed_checksum {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "wal: checksum mismatch",
        ));
    }

    let (record, _): (WalRecord, usize) =
        bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, format!("wal: decode failed: {e}"))
        })?;

    Ok(Some(record))
}
