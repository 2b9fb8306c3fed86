//! The on-disk snapshot format (spec §4.4).
//!
//! A snapshot is a self-contained serialization of a store's state: id
//! counters, the full node/edge maps, the label index, and any enabled
//! property indices. This module owns the wire format only — writing the
//! file to a temp path and renaming it into place is `corvid-engine`'s job,
//! since that is where the filesystem policy (where snapshots live, when to
//! take one) belongs.

use crate::graph::lpg::{Edge, Node};
use corvid_common::types::ValueType;
use corvid_common::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The magic bytes every valid snapshot file begins with.
pub const SNAPSHOT_MAGIC: [u8; 8] = *b"CVSNAP01";

/// The current on-disk format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// The fixed-size header at the start of a snapshot payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: [u8; 8],
    pub format_version: u32,
}

impl SnapshotHeader {
    #[must_use]
    pub fn current() -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            format_version: SNAPSHOT_FORMAT_VERSION,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.magic == SNAPSHOT_MAGIC && self.format_version == SNAPSHOT_FORMAT_VERSION
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::current()
    }
}

/// The full serialized state of an [`crate::graph::lpg::LpgStore`], plus the
/// WAL position as of the moment the snapshot was taken.
///
/// Nodes and edges are stored as their resolved public views (labels and
/// edge types as strings, properties inline) rather than the store's
/// interned internal records, so a snapshot carries no dependency on label
/// or edge-type interning order — [`crate::graph::lpg::LpgStore::restore_from_snapshot`]
/// re-interns everything as it replays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotData {
    pub next_node_id: u64,
    pub next_edge_id: u64,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub property_index_decls: Vec<(String, ValueType)>,
    /// The WAL segment id and byte offset as of snapshot start; entries at
    /// or after this position must still be replayed on recovery.
    pub wal_segment: u64,
    pub wal_offset: u64,
}

/// Encodes `header` and `data` into a self-validating byte buffer: the
/// bincode-encoded payload followed by a trailing CRC-32 of that payload.
///
/// # Errors
/// Returns [`Error::CorruptData`] if encoding fails.
pub fn encode(header: &SnapshotHeader, data: &SnapshotData) -> Result<Vec<u8>> {
    let mut buf = bincode::serde::encode_to_vec((header, data), bincode::config::standard())
        .map_err(|e| Error::CorruptData(format!("snapshot: encode failed: {e}")))?;
    let checksum = crc32fast::hash(&buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    Ok(buf)
}

/// Decodes a buffer produced by [`encode`], validating the checksum and
/// header before returning the payload.
///
/// # Errors
/// Returns [`Error::CorruptData`] if the buffer is truncated, the checksum
/// does not match, or the header's magic/version is unrecognized.
pub fn decode(buf: &[u8]) -> Result<(SnapshotHeader, SnapshotData)> {
    if buf.len() < 4 {
        return Err(Error::CorruptData("snapshot: truncated file".to_string()));
    }
    let (payload, checksum_bytes) = buf.split_at(buf.len() - 4);
    let stored_checksum = u32::from_le_bytes(checksum_bytes.try_into().expect("split_at(len-4) yields 4 bytes"));
    let computed_checksum = crc32fast::hash(payload);
    if stored_checksum != computed_checksum {
        return Err(Error::CorruptData("snapshot: checksum mismatch".to_string()));
    }

    let ((header, data), _): ((SnapshotHeader, SnapshotData), usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| Error::CorruptData(format!("snapshot: decode failed: {e}")))?;

    if !header.is_valid() {
        return Err(Error::CorruptData("snapshot: invalid header".to_string()));
    }

    Ok((header, data))
}
