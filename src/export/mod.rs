//! Bulk dump and restore of the stored property graph.
//!
//! A dump is a single JSON document holding every raw vertex and edge, read
//! through the adapter's bulk read path. Restoring loads it into a SQLite
//! store inside one transaction.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LineageError, Result};
use crate::graph::adapter::{GraphAdapter, RawEdge, RawVertex};
use crate::graph::store::SqliteGraphStore;

/// Current dump format. Bumped on incompatible layout changes.
pub const DUMP_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDump {
    pub format_version: u32,
    /// RFC 3339 UTC timestamp.
    pub exported_at: String,
    pub vertices: Vec<RawVertex>,
    pub edges: Vec<RawEdge>,
}

/// Read every vertex and edge from `graph`.
pub fn dump(graph: &dyn GraphAdapter) -> Result<GraphDump> {
    let vertices = graph.all_vertices()?;
    let edges = graph.all_edges()?;
    tracing::info!(vertices = vertices.len(), edges = edges.len(), "dumped lineage graph");
    Ok(GraphDump {
        format_version: DUMP_FORMAT_VERSION,
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        vertices,
        edges,
    })
}

pub fn write_dump(dump: &GraphDump, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(dump)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a dump file, rejecting unknown format versions.
pub fn read_dump(path: &Path) -> Result<GraphDump> {
    let content = fs::read_to_string(path)?;
    let dump: GraphDump = serde_json::from_str(&content)?;
    if dump.format_version != DUMP_FORMAT_VERSION {
        return Err(LineageError::Other(format!(
            "unsupported dump format version {} in {} (expected {})",
            dump.format_version,
            path.display(),
            DUMP_FORMAT_VERSION
        )));
    }
    Ok(dump)
}

/// Load `dump` into `store`. Existing vertices with the same ID are
/// replaced; existing edges are kept.
pub fn restore(store: &SqliteGraphStore, dump: &GraphDump) -> Result<()> {
    store.upsert_graph(&dump.vertices, &dump.edges)?;
    tracing::info!(
        vertices = dump.vertices.len(),
        edges = dump.edges.len(),
        exported_at = %dump.exported_at,
        "restored lineage graph"
    );
    Ok(())
}
