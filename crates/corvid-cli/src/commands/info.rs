//! Database info command.

use std::path::Path;

use anyhow::Result;
use corvid_engine::GraphDatabase;
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

/// Information about a database.
#[derive(Serialize)]
struct DatabaseInfoOutput {
    mode: String,
    node_count: usize,
    edge_count: usize,
    path: Option<String>,
}

/// Runs the info command.
pub fn run(path: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let db = GraphDatabase::open(path)?;

    let output = DatabaseInfoOutput {
        mode: if db.is_in_memory() { "in-memory".to_string() } else { "persistent".to_string() },
        node_count: db.node_count(),
        edge_count: db.edge_count(),
        path: db.data_dir().map(|p| p.display().to_string()),
    };

    let fmt: Format = format.into();
    match fmt {
        Format::Json => {
            if !quiet {
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Format::Table => {
            let items = vec![
                ("Mode", output.mode),
                ("Nodes", output.node_count.to_string()),
                ("Edges", output.edge_count.to_string()),
                ("Path", output.path.unwrap_or_else(|| "(in-memory)".to_string())),
            ];
            output::print_key_value_table(&items, fmt, quiet);
        }
    }

    Ok(())
}
