//! WAL status command.

use std::path::Path;

use anyhow::Result;
use corvid_engine::GraphDatabase;
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

/// WAL status output.
#[derive(Serialize)]
struct WalStatusOutput {
    enabled: bool,
    segment_count: usize,
    size_bytes: u64,
    current_segment: u64,
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

/// Runs the WAL status command.
pub fn run(path: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let db = GraphDatabase::open(path)?;
    let status = db.wal_status()?;

    let output = WalStatusOutput {
        enabled: !db.is_in_memory(),
        segment_count: status.segment_count,
        size_bytes: status.size_bytes,
        current_segment: status.current_segment,
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
                ("Enabled", output.enabled.to_string()),
                ("Segments", output.segment_count.to_string()),
                ("Size", format_bytes(output.size_bytes)),
                ("Current Segment", output.current_segment.to_string()),
            ];
            output::print_key_value_table(&items, fmt, quiet);
        }
    }

    Ok(())
}
