//! In-memory [`GraphAdapter`] for fixtures, tests, and restored dumps.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::Result;
use crate::graph::adapter::{GraphAdapter, RawEdge, RawVertex};

/// A property graph held entirely in memory.
///
/// Adjacency is indexed in both directions so single-hop lookups are
/// proportional to the vertex degree.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    vertices: BTreeMap<String, RawVertex>,
    edges: BTreeSet<RawEdge>,
    outgoing: HashMap<String, Vec<RawEdge>>,
    incoming: HashMap<String, Vec<RawEdge>>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from element lists, e.g. a restored dump.
    pub fn from_elements(vertices: Vec<RawVertex>, edges: Vec<RawEdge>) -> Self {
        let mut graph = Self::new();
        for vertex in vertices {
            graph.upsert_vertex(vertex);
        }
        for edge in edges {
            graph.upsert_edge(edge);
        }
        graph
    }

    /// Insert or replace a vertex.
    pub fn upsert_vertex(&mut self, vertex: RawVertex) {
        self.vertices.insert(vertex.id.clone(), vertex);
    }

    /// Insert an edge; duplicate `(label, source, target)` triples are ignored.
    pub fn upsert_edge(&mut self, edge: RawEdge) {
        if !self.edges.insert(edge.clone()) {
            return;
        }
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(edge.clone());
        self.incoming.entry(edge.target.clone()).or_default().push(edge);
    }

    /// Shorthand for fixtures: a vertex with a display name.
    pub fn add_vertex(&mut self, id: &str, label: &str, display_name: &str) -> &mut Self {
        self.upsert_vertex(RawVertex::new(id, label).with_property("vedisplayName", display_name));
        self
    }

    /// Shorthand for fixtures: a labeled edge.
    pub fn add_edge(&mut self, label: &str, source: &str, target: &str) -> &mut Self {
        self.upsert_edge(RawEdge::new(label, source, target));
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

fn with_labels(edges: Option<&Vec<RawEdge>>, labels: &[String]) -> Vec<RawEdge> {
    let mut matched: Vec<RawEdge> = edges
        .map(|list| {
            list.iter()
                .filter(|e| labels.iter().any(|l| *l == e.label))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    matched.sort();
    matched
}

impl GraphAdapter for InMemoryGraph {
    fn get_vertex(&self, id: &str) -> Result<Option<RawVertex>> {
        Ok(self.vertices.get(id).cloned())
    }

    fn out_edges(&self, vertex_id: &str, labels: &[String]) -> Result<Vec<RawEdge>> {
        Ok(with_labels(self.outgoing.get(vertex_id), labels))
    }

    fn in_edges(&self, vertex_id: &str, labels: &[String]) -> Result<Vec<RawEdge>> {
        Ok(with_labels(self.incoming.get(vertex_id), labels))
    }

    fn all_vertices(&self) -> Result<Vec<RawVertex>> {
        Ok(self.vertices.values().cloned().collect())
    }

    fn all_edges(&self) -> Result<Vec<RawEdge>> {
        Ok(self.edges.iter().cloned().collect())
    }
}
