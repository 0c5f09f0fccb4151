//! Post-filters applied to an assembled lineage result.
//!
//! Both filters drop every edge touching a removed vertex, so the result
//! stays closed (every edge endpoint is a vertex in the set).

use crate::types::LineageVerticesAndEdges;

/// Remove process and sub-process vertices unless `include_processes`.
pub fn filter_processes(mut result: LineageVerticesAndEdges, include_processes: bool) -> LineageVerticesAndEdges {
    if !include_processes {
        result.retain_vertices(|v| !v.is_process());
    }
    result
}

/// Keep only vertices whose display name contains `substring`.
///
/// Matching is literal and case-sensitive. An empty substring disables the
/// filter; vertices without a display name never match a non-empty one.
/// Condensed and queried vertices get no exemption.
pub fn filter_display_name(mut result: LineageVerticesAndEdges, substring: &str) -> LineageVerticesAndEdges {
    if !substring.is_empty() {
        result.retain_vertices(|v| {
            v.display_name
                .as_deref()
                .is_some_and(|name| name.contains(substring))
        });
    }
    result
}
