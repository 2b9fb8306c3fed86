//! WAL append path: segment rollover, checksum framing, and durability.

use super::segment;
use super::WalRecord;
use corvid_common::utils::error::{Error, Result};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A position in the WAL: a segment id plus a byte offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalPosition {
    pub segment_id: u64,
    pub offset: u64,
}

/// When an `append` call fsyncs the WAL before reporting success (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalSyncPolicy {
    /// fsync after every append. Durable but slower; the default.
    #[default]
    PerEntry,
    /// Flush to the OS page cache but skip fsync. Higher throughput, weaker
    /// guarantee: entries can survive a process crash but not a power loss.
    Batched,
}

struct OpenSegment {
    id: u64,
    writer: BufWriter<File>,
    size: u64,
}

/// Manages the append-only, segmented Write-Ahead Log.
///
/// Every [`WalManager::append`] call writes a length-prefixed, checksummed
/// record to the current segment and, under [`WalSyncPolicy::PerEntry`],
/// fsyncs it before returning.
pub struct WalManager {
    dir: PathBuf,
    segment_size: u64,
    sync_policy: WalSyncPolicy,
    current: Mutex<OpenSegment>,
}

impl WalManager {
    /// Opens (creating if necessary) the WAL directory, resuming at the
    /// newest existing segment or starting a fresh segment `0`, with the
    /// default [`WalSyncPolicy::PerEntry`] durability policy.
    ///
    /// # Errors
    /// Returns an I/O error if the directory or segment file cannot be
    /// created.
    pub fn open(dir: impl AsRef<Path>, segment_size: u64) -> Result<Self> {
        Self::open_with_policy(dir, segment_size, WalSyncPolicy::PerEntry)
    }

    /// Opens with an explicit [`WalSyncPolicy`].
    ///
    /// # Errors
    /// Returns an I/O error if the directory or segment file cannot be
    /// created.
    pub fn open_with_policy(dir: impl AsRef<Path>, segment_size: u64, sync_policy: WalSyncPolicy) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let segments = segment::list_segments(&dir)?;
        let id = segments.last().copied().unwrap_or(0);
        let path = segment::file_path(&dir, id);
        let file = OpenOptions::new().create(true).read(true).append(true).open(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            dir,
            segment_size,
            sync_policy,
            current: Mutex::new(OpenSegment {
                id,
                writer: BufWriter::new(file),
                size,
            }),
        })
    }

    /// Appends `record`, rolling over to a new segment first if the current
    /// one has reached `segment_size`. Returns the position the record was
    /// written at.
    ///
    /// # Errors
    /// Returns an I/O error if encoding or writing fails.
    pub fn append(&self, record: &WalRecord) -> Result<WalPosition> {
        let data = bincode::serde::encode_to_vec(record, bincode::config::standard())
            .map_err(|e| Error::CorruptData(format!("wal: encode failed: {e}")))?;
        let checksum = crc32fast::hash(&data);

        let mut current = self.current.lock();
        if current.size >= self.segment_size && self.segment_size > 0 {
            self.roll_over(&mut current)?;
        }

        let position = WalPosition {
            segment_id: current.id,
            offset: current.size,
        };

        let len = u32::try_from(data.len())
            .map_err(|_| Error::InvalidArgument("wal record too large".to_string()))?;
        current.writer.write_all(&len.to_le_bytes())?;
        current.writer.write_all(&data)?;
        current.writer.write_all(&checksum.to_le_bytes())?;
        current.writer.flush()?;
        if self.sync_policy == WalSyncPolicy::PerEntry {
            current.writer.get_ref().sync_data()?;
        }
        current.size += 4 + data.len() as u64 + 4;

        Ok(position)
    }

    fn roll_over(&self, current: &mut OpenSegment) -> Result<()> {
        current.writer.flush()?;
        let next_id = current.id + 1;
        let path = segment::file_path(&self.dir, next_id);
        let file = OpenOptions::new().create(true).read(true).append(true).open(&path)?;
        current.id = next_id;
        current.writer = BufWriter::new(file);
        current.size = 0;
        Ok(())
    }

    /// Returns the position the next `append` will write at.
    #[must_use]
    pub fn current_position(&self) -> WalPosition {
        let current = self.current.lock();
        WalPosition {
            segment_id: current.id,
            offset: current.size,
        }
    }

    /// Flushes buffered writes without fsync.
    ///
    /// # Errors
    /// Returns an I/O error if the flush fails.
    pub fn flush(&self) -> Result<()> {
        self.current.lock().writer.flush().map_err(Error::from)
    }

    /// Deletes every segment file strictly before `through.segment_id`,
    /// called after a successful snapshot establishes a new recovery
    /// baseline.
    ///
    /// # Errors
    /// Returns an I/O error if a segment file exists but cannot be removed.
    pub fn truncate_through(&self, through: WalPosition) -> Result<()> {
        for id in segment::list_segments(&self.dir)? {
            if id < through.segment_id {
                fs::remove_file(segment::file_path(&self.dir, id))?;
            }
        }
        Ok(())
    }

    /// Returns the WAL's directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_common::types::NodeId;

    fn sample_record() -> WalRecord {
        WalRecord::NodeCreated {
            id: NodeId::new(1),
            labels: vec!["Person".to_string()],
            properties: vec![],
        }
    }

    #[test]
    fn append_advances_position() {
        let dir = tempfile::tempdir().unwrap();
        let wal = WalManager::open(dir.path(), 1024 * 1024).unwrap();

        let first = wal.append(&sample_record()).unwrap();
        let second = wal.append(&sample_record()).unwrap();

        assert_eq!(first.segment_id, 0);
        assert_eq!(second.segment_id, 0);
        assert!(second.offset > first.offset);
    }

    #[test]
    fn append_rolls_over_when_segment_is_full() {
        let dir = tempfile::tempdir().unwrap();
        let wal = WalManager::open(dir.path(), 1).unwrap();

        let first = wal.append(&sample_record()).unwrap();
        let second = wal.append(&sample_record()).unwrap();

        assert_eq!(first.segment_id, 0);
        assert_eq!(second.segment_id, 1);
        assert_eq!(second.offset, 0);
    }

    #[test]
    fn truncate_through_removes_older_segments() {
        let dir = tempfile::tempdir().unwrap();
        let wal = WalManager::open(dir.path(), 1).unwrap();
        wal.append(&sample_record()).unwrap();
        wal.append(&sample_record()).unwrap();
        wal.append(&sample_record()).unwrap();

        assert_eq!(segment::list_segments(dir.path()).unwrap(), vec![0, 1, 2]);
        wal.truncate_through(WalPosition { segment_id: 2, offset: 0 }).unwrap();
        assert_eq!(segment::list_segments(dir.path()).unwrap(), vec![2]);
    }

    #[test]
    fn batched_policy_skips_fsync_but_still_persists_records() {
        let dir = tempfile::tempdir().unwrap();
        let wal = WalManager::open_with_policy(dir.path(), 1024 * 1024, WalSyncPolicy::Batched).unwrap();
        let position = wal.append(&sample_record()).unwrap();
        wal.flush().unwrap();
        drop(wal);

        let resumed = WalManager::open(dir.path(), 1024 * 1024).unwrap();
        assert_eq!(resumed.current_position().segment_id, position.segment_id);
        assert!(resumed.current_position().offset > position.offset);
    }

    #[test]
    fn open_resumes_at_newest_existing_segment() {
        let dir = tempfile::tempdir().unwrap();
        {
            let wal = WalManager::open(dir.path(), 1).unwrap();
            wal.append(&sample_record()).unwrap();
            wal.append(&sample_record()).unwrap();
        }
        let resumed = WalManager::open(dir.path(), 1).unwrap();
        assert_eq!(resumed.current_position().segment_id, 1);
    }
}
