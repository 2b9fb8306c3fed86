//! Database statistics command.

use std::path::Path;

use anyhow::Result;
use corvid_engine::GraphDatabase;
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

/// Detailed database statistics.
#[derive(Serialize)]
struct StatsOutput {
    node_count: usize,
    edge_count: usize,
    total_queries: u64,
    avg_query_time_ms: f64,
}

/// Runs the stats command.
pub fn run(path: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let db = GraphDatabase::open(path)?;
    let stats = db.statistics();

    let output = StatsOutput {
        node_count: stats.node_count,
        edge_count: stats.edge_count,
        total_queries: stats.total_queries,
        avg_query_time_ms: stats.avg_query_time_ms,
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
                ("Nodes", output.node_count.to_string()),
                ("Edges", output.edge_count.to_string()),
                ("Queries", output.total_queries.to_string()),
                ("Avg Query Time (ms)", format!("{:.3}", output.avg_query_time_ms)),
            ];
            output::print_key_value_table(&items, fmt, quiet);
        }
    }

    Ok(())
}
