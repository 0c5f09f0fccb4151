//! The read-only capability the lineage engine needs from a graph store.
//!
//! Scope resolvers depend only on [`GraphAdapter`]; any backing engine
//! (SQLite, in-memory, remote) can serve lineage queries by implementing
//! single-hop lookups. Bounded repetition is layered on top in
//! [`crate::graph::traversal`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Raw graph elements
// ---------------------------------------------------------------------------

/// A vertex as persisted in the property graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVertex {
    /// Stable identifier, unique within one graph instance.
    pub id: String,
    /// Element kind (table, column, process, glossary-term, ...).
    pub label: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl RawVertex {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A directed, labeled edge as persisted in the property graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawEdge {
    pub label: String,
    pub source: String,
    pub target: String,
}

impl RawEdge {
    pub fn new(label: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// The endpoint a traversal moving in `direction` arrives at.
    pub fn far_end(&self, direction: Direction) -> &str {
        match direction {
            Direction::Upstream => &self.source,
            Direction::Downstream => &self.target,
        }
    }

    /// The endpoint a traversal moving in `direction` leaves from.
    pub fn near_end(&self, direction: Direction) -> &str {
        match direction {
            Direction::Upstream => &self.target,
            Direction::Downstream => &self.source,
        }
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way a traversal follows data flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards sources: follow incoming edges.
    Upstream,
    /// Towards destinations: follow outgoing edges.
    Downstream,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::Downstream => "downstream",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GraphAdapter
// ---------------------------------------------------------------------------

/// Read access to a persisted property graph.
///
/// Implementations must be safe to share between concurrent queries.
/// An empty `labels` slice matches no edges.
pub trait GraphAdapter: Send + Sync {
    /// Exact lookup by stable identifier.
    fn get_vertex(&self, id: &str) -> Result<Option<RawVertex>>;

    /// Edges leaving `vertex_id` whose label is in `labels`.
    fn out_edges(&self, vertex_id: &str, labels: &[String]) -> Result<Vec<RawEdge>>;

    /// Edges arriving at `vertex_id` whose label is in `labels`.
    fn in_edges(&self, vertex_id: &str, labels: &[String]) -> Result<Vec<RawEdge>>;

    /// Every vertex in the graph (bulk export path).
    fn all_vertices(&self) -> Result<Vec<RawVertex>>;

    /// Every edge in the graph (bulk export path).
    fn all_edges(&self) -> Result<Vec<RawEdge>>;

    /// Single-hop edges in a data-flow direction.
    fn edges(&self, vertex_id: &str, direction: Direction, labels: &[String]) -> Result<Vec<RawEdge>> {
        match direction {
            Direction::Upstream => self.in_edges(vertex_id, labels),
            Direction::Downstream => self.out_edges(vertex_id, labels),
        }
    }
}
