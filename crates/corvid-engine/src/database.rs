//! [`GraphDatabase`]: the single-writer facade wiring a store to its WAL and
//! snapshot file.

use crate::config::Config;
use corvid_adapters::storage::{WalManager, WalPosition, WalRecord, WalRecovery};
use corvid_common::types::{EdgeId, NodeId, PropertyKey, Value, ValueType};
use corvid_common::utils::error::{Error, Result};
use corvid_core::graph::Direction;
use corvid_core::graph::lpg::{Edge, LpgStore, Node, StoreStatistics};
use corvid_core::storage::snapshot::{self, SnapshotData, SnapshotHeader};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

const SNAPSHOT_FILE_NAME: &str = "snapshot.bin";
const SNAPSHOT_TMP_FILE_NAME: &str = "snapshot.bin.tmp";

/// A snapshot of the WAL's on-disk state, for the `wal` CLI command.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalStatus {
    pub segment_count: usize,
    pub size_bytes: u64,
    pub current_segment: u64,
}

/// An open, durable labeled-property-graph database.
///
/// Every mutating call takes `commit_lock` for its duration: mutate the
/// in-memory store, then append the WAL entry, matching §5's single-writer
/// model (the store's own per-field `RwLock`s already serialize concurrent
/// readers against that mutation).
pub struct GraphDatabase {
    store: LpgStore,
    wal: Option<WalManager>,
    data_dir: Option<PathBuf>,
    commit_lock: Mutex<()>,
}

impl GraphDatabase {
    /// Opens an in-memory-only database: no WAL, no snapshot, nothing
    /// survives process exit.
    #[must_use]
    pub fn new_in_memory() -> Self {
        Self::open_with_config(Config::in_memory()).expect("in-memory open never fails")
    }

    /// Opens (or creates) a database at `path`, replaying WAL history on top
    /// of the newest snapshot per the recovery sequence (spec §4.5).
    ///
    /// # Errors
    /// Returns an error if the data directory or WAL cannot be opened, or if
    /// a present snapshot file is corrupt.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(Config::persistent(path))
    }

    /// Opens with a fully specified [`Config`].
    ///
    /// # Errors
    /// See [`GraphDatabase::open`].
    pub fn open_with_config(config: Config) -> Result<Self> {
        let Some(data_dir) = config.data_dir.clone() else {
            return Ok(Self {
                store: LpgStore::new(),
                wal: None,
                data_dir: None,
                commit_lock: Mutex::new(()),
            });
        };

        fs::create_dir_all(&data_dir)?;
        let wal_dir = data_dir.join("wal");
        let wal = WalManager::open_with_policy(&wal_dir, config.wal_segment_size, config.wal_sync_policy)?;

        let snapshot_path = data_dir.join(SNAPSHOT_FILE_NAME);
        let (store, replay_from) = match fs::read(&snapshot_path) {
            Ok(bytes) => {
                let (_header, data) = snapshot::decode(&bytes)?;
                let replay_from = WalPosition { segment_id: data.wal_segment, offset: data.wal_offset };
                (LpgStore::restore_from_snapshot(data), replay_from)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (LpgStore::new(), WalPosition { segment_id: 0, offset: 0 })
            }
            Err(e) => return Err(Error::from(e)),
        };

        let recovery = WalRecovery::new(&wal_dir);
        for record in recovery.iter_from(replay_from).map_err(Error::from)? {
            apply_record(&store, record);
        }

        Ok(Self { store, wal: Some(wal), data_dir: Some(data_dir), commit_lock: Mutex::new(()) })
    }

    /// Returns whether this database was opened without a data directory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.wal.is_none()
    }

    /// Returns the data directory this database was opened with, `None` for
    /// an in-memory database.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Reports the WAL's current size and segment count. Every field is
    /// zero/`None` for an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the WAL directory cannot be read.
    pub fn wal_status(&self) -> Result<WalStatus> {
        let Some(wal) = &self.wal else {
            return Ok(WalStatus { segment_count: 0, size_bytes: 0, current_segment: 0 });
        };
        let segments = corvid_adapters::storage::wal::segment::list_segments(wal.dir())?;
        let size_bytes = segments
            .iter()
            .map(|&id| {
                fs::metadata(corvid_adapters::storage::wal::segment::file_path(wal.dir(), id))
                    .map(|m| m.len())
                    .unwrap_or(0)
            })
            .sum();
        Ok(WalStatus {
            segment_count: segments.len(),
            size_bytes,
            current_segment: wal.current_position().segment_id,
        })
    }

    fn append(&self, record: &WalRecord) -> Result<()> {
        if let Some(wal) = &self.wal {
            wal.append(record)?;
        }
        Ok(())
    }

    // === Node operations ===

    /// Creates a node with `labels` and `properties`.
    ///
    /// # Errors
    /// Returns an error if a label is empty, or if the WAL append fails.
    pub fn create_node<K, V>(&self, labels: &[&str], properties: impl IntoIterator<Item = (K, V)>) -> Result<Node>
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        let _guard = self.commit_lock.lock();
        let properties: Vec<(PropertyKey, Value)> = properties.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let node = self.store.create_node(labels, properties.clone())?;
        self.append(&WalRecord::NodeCreated {
            id: node.id,
            labels: labels.iter().map(|s| (*s).to_string()).collect(),
            properties,
        })?;
        Ok(node)
    }

    /// Reads a node by id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such node exists.
    pub fn get_node(&self, id: NodeId) -> Result<Node> {
        self.store.get_node(id)
    }

    /// Merges `properties` into an existing node.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such node exists, or if the WAL
    /// append fails.
    pub fn update_node<K, V>(&self, id: NodeId, properties: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        let _guard = self.commit_lock.lock();
        let properties: Vec<(PropertyKey, Value)> = properties.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.store.update_node(id, properties.clone())?;
        self.append(&WalRecord::NodeUpdated { id, properties, label_added: None, label_removed: None })
    }

    /// Adds `label` to a node.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`]/[`Error::InvalidArgument`], or if the WAL
    /// append fails.
    pub fn add_label(&self, id: NodeId, label: &str) -> Result<()> {
        let _guard = self.commit_lock.lock();
        self.store.add_label(id, label)?;
        self.append(&WalRecord::NodeUpdated {
            id,
            properties: Vec::new(),
            label_added: Some(label.to_string()),
            label_removed: None,
        })
    }

    /// Removes `label` from a node.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`], or if the WAL append fails.
    pub fn remove_label(&self, id: NodeId, label: &str) -> Result<()> {
        let _guard = self.commit_lock.lock();
        self.store.remove_label(id, label)?;
        self.append(&WalRecord::NodeUpdated {
            id,
            properties: Vec::new(),
            label_added: None,
            label_removed: Some(label.to_string()),
        })
    }

    /// Deletes a node, cascading to every incident edge.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`], or if the WAL append fails.
    pub fn delete_node(&self, id: NodeId) -> Result<()> {
        let _guard = self.commit_lock.lock();
        let incident: Vec<EdgeId> = self
            .store
            .get_outgoing_edges(id)
            .into_iter()
            .chain(self.store.get_incoming_edges(id))
            .map(|edge| edge.id)
            .collect();
        self.store.delete_node(id)?;
        for edge_id in incident {
            self.append(&WalRecord::EdgeDeleted { id: edge_id })?;
        }
        self.append(&WalRecord::NodeDeleted { id })
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    #[must_use]
    pub fn find_nodes_by_label(&self, label: &str) -> Vec<Node> {
        self.store.find_nodes_by_label(label)
    }

    /// Opts `key` into eager secondary indexing.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOption`] for [`ValueType::Vector`].
    pub fn enable_property_index(&self, key: &str, value_type: ValueType) -> Result<()> {
        self.store.enable_property_index(key, value_type)
    }

    #[must_use]
    pub fn find_nodes_by_property(&self, name: &str, value: &Value) -> Vec<Node> {
        self.store.find_nodes_by_property(name, value)
    }

    // === Edge operations ===

    /// Creates an edge from `src` to `dst`.
    ///
    /// # Errors
    /// Returns [`Error::EndpointMissing`] if either endpoint is absent, or
    /// if the WAL append fails.
    pub fn create_edge<K, V>(
        &self,
        src: NodeId,
        dst: NodeId,
        edge_type: &str,
        properties: impl IntoIterator<Item = (K, V)>,
        weight: f64,
    ) -> Result<Edge>
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        let _guard = self.commit_lock.lock();
        let properties: Vec<(PropertyKey, Value)> = properties.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let edge = self.store.create_edge(src, dst, edge_type, properties.clone(), weight)?;
        self.append(&WalRecord::EdgeCreated { id: edge.id, src, dst, edge_type: edge_type.to_string(), properties, weight })?;
        Ok(edge)
    }

    /// Reads an edge by id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such edge exists.
    pub fn get_edge(&self, id: EdgeId) -> Result<Edge> {
        self.store.get_edge(id)
    }

    /// Deletes an edge.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`], or if the WAL append fails.
    pub fn delete_edge(&self, id: EdgeId) -> Result<()> {
        let _guard = self.commit_lock.lock();
        self.store.delete_edge(id)?;
        self.append(&WalRecord::EdgeDeleted { id })
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    #[must_use]
    pub fn get_outgoing_edges(&self, node: NodeId) -> Vec<Edge> {
        self.store.get_outgoing_edges(node)
    }

    #[must_use]
    pub fn get_incoming_edges(&self, node: NodeId) -> Vec<Edge> {
        self.store.get_incoming_edges(node)
    }

    #[must_use]
    pub fn neighbors(&self, node: NodeId, direction: Direction) -> Vec<NodeId> {
        self.store.neighbors(node, direction)
    }

    /// Read-only access to the store, for algorithm calls. Algorithms don't
    /// take the commit lock: every mutation's effects are already visible
    /// once its call returns, and the store's own field-level locks
    /// serialize against any writer in progress.
    #[must_use]
    pub fn store(&self) -> &LpgStore {
        &self.store
    }

    #[must_use]
    pub fn statistics(&self) -> StoreStatistics {
        self.store.statistics()
    }

    // === Lifecycle ===

    /// Writes a full snapshot to a temp file, renames it into place, then
    /// truncates WAL segments it supersedes. A no-op that succeeds
    /// trivially for an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the temp file cannot be written, renamed, or if
    /// WAL truncation fails.
    pub fn snapshot(&self) -> Result<()> {
        let _guard = self.commit_lock.lock();
        let Some(data_dir) = &self.data_dir else {
            return Ok(());
        };
        let wal = self.wal.as_ref().expect("a persistent database always has a WAL");

        let position = wal.current_position();
        let mut data = self.store.snapshot_data();
        data.wal_segment = position.segment_id;
        data.wal_offset = position.offset;

        let bytes = snapshot::encode(&SnapshotHeader::current(), &data)?;
        let tmp_path = data_dir.join(SNAPSHOT_TMP_FILE_NAME);
        let final_path = data_dir.join(SNAPSHOT_FILE_NAME);
        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, &final_path)?;

        wal.truncate_through(position)?;
        Ok(())
    }

    /// Flushes buffered writes and releases in-memory resources. Does not
    /// snapshot; call [`GraphDatabase::snapshot`] first if a new recovery
    /// baseline is wanted.
    pub fn close(&self) {
        if let Some(wal) = &self.wal {
            let _ = wal.flush();
        }
        self.store.close();
    }
}

impl Drop for GraphDatabase {
    fn drop(&mut self) {
        self.close();
    }
}

fn apply_record(store: &LpgStore, record: WalRecord) {
    match record {
        WalRecord::NodeCreated { id, labels, properties } => {
            let node = Node {
                id,
                labels,
                properties: properties.into_iter().collect(),
                created_at: corvid_common::types::Timestamp::now(),
                updated_at: corvid_common::types::Timestamp::now(),
            };
            store.insert_node_verbatim(node);
        }
        WalRecord::NodeUpdated { id, properties, label_added, label_removed } => {
            let _ = store.update_node(id, properties);
            if let Some(label) = label_added {
                let _ = store.add_label(id, &label);
            }
            if let Some(label) = label_removed {
                let _ = store.remove_label(id, &label);
            }
        }
        WalRecord::NodeDeleted { id } => {
            let _ = store.delete_node(id);
        }
        WalRecord::EdgeCreated { id, src, dst, edge_type, properties, weight } => {
            let edge = Edge {
                id,
                src,
                dst,
                edge_type,
                properties: properties.into_iter().collect(),
                weight,
                created_at: corvid_common::types::Timestamp::now(),
            };
            store.insert_edge_verbatim(edge);
        }
        WalRecord::EdgeDeleted { id } => {
            let _ = store.delete_edge(id);
        }
    }
}
