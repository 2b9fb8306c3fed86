//! Snapshot command.

use std::path::Path;

use anyhow::Result;
use corvid_engine::GraphDatabase;

use crate::OutputFormat;
use crate::output;

/// Runs the snapshot command: writes a full snapshot and truncates WAL
/// segments it supersedes.
pub fn run(path: &Path, _format: OutputFormat, quiet: bool) -> Result<()> {
    output::status("Taking snapshot...", quiet);

    let db = GraphDatabase::open(path)?;
    db.snapshot()?;

    output::success("snapshot written", quiet);
    Ok(())
}
