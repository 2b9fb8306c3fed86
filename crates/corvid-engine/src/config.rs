//! Database configuration: where data lives and how durable writes are.

pub use corvid_adapters::storage::WalSyncPolicy;
use std::path::{Path, PathBuf};

/// How aggressively the WAL segments roll over, in bytes.
pub const DEFAULT_WAL_SEGMENT_SIZE: u64 = 64 * 1024 * 1024;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the WAL segments and snapshot file, `None` for a
    /// purely in-memory database (no durability).
    pub data_dir: Option<PathBuf>,
    /// Maximum size of a single WAL segment before rolling over.
    pub wal_segment_size: u64,
    /// Whether `append` fsyncs every entry or only flushes to the page cache.
    pub wal_sync_policy: WalSyncPolicy,
    /// Whether newly created property keys should be eagerly indexed on
    /// first write. Off by default — indexing is opt-in per spec §4.2.
    pub eager_property_index: bool,
}

impl Config {
    /// An in-memory-only configuration: no WAL, no snapshot, nothing
    /// survives process exit.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            wal_segment_size: DEFAULT_WAL_SEGMENT_SIZE,
            wal_sync_policy: WalSyncPolicy::PerEntry,
            eager_property_index: false,
        }
    }

    /// A persistent configuration backed by `data_dir`.
    #[must_use]
    pub fn persistent(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: Some(data_dir.as_ref().to_path_buf()),
            wal_segment_size: DEFAULT_WAL_SEGMENT_SIZE,
            wal_sync_policy: WalSyncPolicy::PerEntry,
            eager_property_index: false,
        }
    }

    /// Overrides the WAL segment rollover size.
    #[must_use]
    pub fn with_wal_segment_size(mut self, bytes: u64) -> Self {
        self.wal_segment_size = bytes;
        self
    }

    /// Overrides the WAL fsync policy.
    #[must_use]
    pub fn with_wal_sync_policy(mut self, policy: WalSyncPolicy) -> Self {
        self.wal_sync_policy = policy;
        self
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.data_dir.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_has_no_data_dir() {
        assert!(Config::in_memory().is_in_memory());
    }

    #[test]
    fn persistent_carries_the_given_path() {
        let config = Config::persistent("/tmp/corvid-data");
        assert!(!config.is_in_memory());
        assert_eq!(config.data_dir.as_deref(), Some(Path::new("/tmp/corvid-data")));
    }
}
