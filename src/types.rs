//! Core domain types for lineage queries.
//!
//! Everything here is built fresh per query and dropped once the response
//! is serialized. Vertices are identified by `node_id`, edges by the
//! `(label, source, destination)` triple.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Reserved identifiers
// ---------------------------------------------------------------------------

/// Node ID of the synthetic vertex standing in for an upstream chain.
pub const CONDENSED_SOURCE_ID: &str = "__lineage_condensed_source__";

/// Node ID of the synthetic vertex standing in for a downstream chain.
pub const CONDENSED_DESTINATION_ID: &str = "__lineage_condensed_destination__";

/// Kind (and edge label) carried by condensed vertices and their edges.
pub const CONDENSED_KIND: &str = "condensed";

/// Display name of every condensed vertex.
pub const CONDENSED_DISPLAY_NAME: &str = "Condensed";

/// Vertex kinds removed by the process filter.
pub const PROCESS_KINDS: &[&str] = &["process", "sub-process"];

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// The kind of lineage question being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    UltimateSource,
    UltimateDestination,
    EndToEnd,
    SourceAndDestination,
    Glossary,
}

impl Scope {
    pub const ALL: [Scope; 5] = [
        Self::UltimateSource,
        Self::UltimateDestination,
        Self::EndToEnd,
        Self::SourceAndDestination,
        Self::Glossary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UltimateSource => "ultimate-source",
            Self::UltimateDestination => "ultimate-destination",
            Self::EndToEnd => "end-to-end",
            Self::SourceAndDestination => "source-and-destination",
            Self::Glossary => "glossary",
        }
    }

    /// Parse from a loose string: case-insensitive, `_` or `-` separated.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "ultimate-source" | "source" => Some(Self::UltimateSource),
            "ultimate-destination" | "destination" => Some(Self::UltimateDestination),
            "end-to-end" | "e2e" => Some(Self::EndToEnd),
            "source-and-destination" => Some(Self::SourceAndDestination),
            "glossary" => Some(Self::Glossary),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Granularity of the edges a query may traverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Host,
    Table,
    Column,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Table => "table",
            Self::Column => "column",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "host" | "host-view" | "host_view" => Some(Self::Host),
            "table" | "table-view" | "table_view" => Some(Self::Table),
            "column" | "column-view" | "column_view" => Some(Self::Column),
            _ => None,
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LineageVertex
// ---------------------------------------------------------------------------

/// A lineage-facing node. Equality and hashing use `node_id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageVertex {
    pub node_id: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_guid: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl LineageVertex {
    pub fn new(node_id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            kind: kind.into(),
            display_name: None,
            entity_guid: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The synthetic vertex for one side of a condensed chain.
    pub fn condensed(node_id: &str) -> Self {
        Self::new(node_id, CONDENSED_KIND).with_display_name(CONDENSED_DISPLAY_NAME)
    }

    pub fn is_process(&self) -> bool {
        PROCESS_KINDS.contains(&self.kind.as_str())
    }

    pub fn is_condensed(&self) -> bool {
        self.node_id == CONDENSED_SOURCE_ID || self.node_id == CONDENSED_DESTINATION_ID
    }
}

impl PartialEq for LineageVertex {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id
    }
}

impl Eq for LineageVertex {}

impl Hash for LineageVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node_id.hash(state);
    }
}

// ---------------------------------------------------------------------------
// LineageEdge
// ---------------------------------------------------------------------------

/// A directed, labeled connection between two lineage vertices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineageEdge {
    pub label: String,
    pub source_node_id: String,
    pub destination_node_id: String,
}

impl LineageEdge {
    pub fn new(
        label: impl Into<String>,
        source_node_id: impl Into<String>,
        destination_node_id: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            source_node_id: source_node_id.into(),
            destination_node_id: destination_node_id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LineageVerticesAndEdges
// ---------------------------------------------------------------------------

/// A query result: vertices deduplicated by `node_id`, edges by identity.
///
/// Backed by ordered collections so serialization and comparison are
/// deterministic regardless of traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageVerticesAndEdges {
    vertices: BTreeMap<String, LineageVertex>,
    edges: BTreeSet<LineageEdge>,
}

impl LineageVerticesAndEdges {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding a single vertex and no edges.
    pub fn single(vertex: LineageVertex) -> Self {
        let mut result = Self::new();
        result.insert_vertex(vertex);
        result
    }

    /// Add a vertex. The first vertex seen for a `node_id` wins; returns
    /// `false` when one was already present.
    pub fn insert_vertex(&mut self, vertex: LineageVertex) -> bool {
        if self.vertices.contains_key(&vertex.node_id) {
            return false;
        }
        self.vertices.insert(vertex.node_id.clone(), vertex);
        true
    }

    pub fn insert_edge(&mut self, edge: LineageEdge) -> bool {
        self.edges.insert(edge)
    }

    pub fn vertex(&self, node_id: &str) -> Option<&LineageVertex> {
        self.vertices.get(node_id)
    }

    pub fn contains_vertex(&self, node_id: &str) -> bool {
        self.vertices.contains_key(node_id)
    }

    pub fn contains_edge(&self, label: &str, source: &str, destination: &str) -> bool {
        self.edges.contains(&LineageEdge::new(label, source, destination))
    }

    pub fn vertices(&self) -> impl Iterator<Item = &LineageVertex> {
        self.vertices.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &LineageEdge> {
        self.edges.iter()
    }

    pub fn node_ids(&self) -> BTreeSet<&str> {
        self.vertices.keys().map(String::as_str).collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    /// Union two results. Vertices already in `self` take precedence.
    pub fn merge(mut self, other: Self) -> Self {
        for (id, vertex) in other.vertices {
            self.vertices.entry(id).or_insert(vertex);
        }
        self.edges.extend(other.edges);
        self
    }

    /// Keep only vertices matching `keep`, dropping every edge that
    /// touches a removed vertex.
    pub fn retain_vertices<F>(&mut self, mut keep: F)
    where
        F: FnMut(&LineageVertex) -> bool,
    {
        self.vertices.retain(|_, v| keep(v));
        self.prune_dangling_edges();
    }

    /// Drop edges whose source or destination is not in the vertex set.
    pub fn prune_dangling_edges(&mut self) {
        let vertices = &self.vertices;
        self.edges.retain(|e| {
            vertices.contains_key(&e.source_node_id) && vertices.contains_key(&e.destination_node_id)
        });
    }

    /// True when every edge endpoint refers to a vertex in the set.
    pub fn is_closed(&self) -> bool {
        self.edges.iter().all(|e| {
            self.vertices.contains_key(&e.source_node_id)
                && self.vertices.contains_key(&e.destination_node_id)
        })
    }
}

#[derive(Serialize)]
struct WireRef<'a> {
    vertices: Vec<&'a LineageVertex>,
    edges: Vec<&'a LineageEdge>,
}

#[derive(Deserialize)]
struct WireOwned {
    #[serde(default)]
    vertices: Vec<LineageVertex>,
    #[serde(default)]
    edges: Vec<LineageEdge>,
}

impl Serialize for LineageVerticesAndEdges {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        WireRef {
            vertices: self.vertices.values().collect(),
            edges: self.edges.iter().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LineageVerticesAndEdges {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = WireOwned::deserialize(deserializer)?;
        let mut result = Self::new();
        for vertex in wire.vertices {
            result.insert_vertex(vertex);
        }
        for edge in wire.edges {
            result.insert_edge(edge);
        }
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// LineageQuery
// ---------------------------------------------------------------------------

/// One lineage request as received from the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageQuery {
    pub scope: Scope,
    pub view: View,
    pub starting_node_id: String,
    /// Empty means "no display-name filter".
    #[serde(default)]
    pub display_name_must_contain: String,
    #[serde(default = "default_include_processes")]
    pub include_processes: bool,
}

fn default_include_processes() -> bool {
    true
}

impl LineageQuery {
    pub fn new(scope: Scope, view: View, starting_node_id: impl Into<String>) -> Self {
        Self {
            scope,
            view,
            starting_node_id: starting_node_id.into(),
            display_name_must_contain: String::new(),
            include_processes: true,
        }
    }

    pub fn display_name_must_contain(mut self, substring: impl Into<String>) -> Self {
        self.display_name_must_contain = substring.into();
        self
    }

    pub fn include_processes(mut self, include: bool) -> Self {
        self.include_processes = include;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
