//! Row → raw graph element converters.

use std::collections::BTreeMap;

use rusqlite::Row;

use crate::error::Result;
use crate::graph::adapter::{RawEdge, RawVertex};

/// Convert a `vertices` row (`id`, `label`, `properties`) to a [`RawVertex`].
pub fn row_to_raw_vertex(row: &Row<'_>) -> Result<RawVertex> {
    let properties: String = row.get("properties")?;
    let properties: BTreeMap<String, String> = if properties.trim().is_empty() {
        BTreeMap::new()
    } else {
        serde_json::from_str(&properties)?
    };
    Ok(RawVertex {
        id: row.get("id")?,
        label: row.get("label")?,
        properties,
    })
}

/// Convert an `edges` row (`source_id`, `target_id`, `label`) to a [`RawEdge`].
pub fn row_to_raw_edge(row: &Row<'_>) -> Result<RawEdge> {
    Ok(RawEdge {
        label: row.get("label")?,
        source: row.get("source_id")?,
        target: row.get("target_id")?,
    })
}
