//! The five scope resolvers.
//!
//! Each resolver looks up the starting vertex, traverses through
//! [`GraphTraversal`], and returns a fresh [`LineageVerticesAndEdges`].
//! Results of sub-steps are merged by value; nothing is shared between
//! calls.

use crate::config::schema::GlossaryConfig;
use crate::error::{LineageError, Result};
use crate::graph::adapter::{Direction, RawVertex};
use crate::graph::traversal::{GraphTraversal, Subgraph};
use crate::lineage::abstraction::VertexMapper;
use crate::lineage::condense::{condense, Side};
use crate::lineage::cycle_guard;
use crate::types::{LineageVertex, LineageVerticesAndEdges, Scope};

/// Resolves lineage scopes against one traversal.
pub struct ScopeResolver<'a> {
    traversal: GraphTraversal<'a>,
    mapper: &'a VertexMapper,
    glossary: &'a GlossaryConfig,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(traversal: GraphTraversal<'a>, mapper: &'a VertexMapper, glossary: &'a GlossaryConfig) -> Self {
        Self {
            traversal,
            mapper,
            glossary,
        }
    }

    fn start_vertex(&self, guid: &str) -> Result<RawVertex> {
        self.traversal
            .vertex(guid)?
            .ok_or_else(|| LineageError::NodeNotFound {
                node_id: guid.to_string(),
            })
    }

    fn map_subgraph(&self, subgraph: &Subgraph) -> LineageVerticesAndEdges {
        let mut result = LineageVerticesAndEdges::new();
        for vertex in subgraph.vertices.values() {
            result.insert_vertex(self.mapper.to_lineage_vertex(vertex));
        }
        for edge in &subgraph.edges {
            result.insert_edge(self.mapper.to_lineage_edge(edge));
        }
        result
    }

    /// Boundary computation + cycle guard + condensation for one side.
    fn condensed_side(
        &self,
        scope: Scope,
        start: &RawVertex,
        side: Side,
        labels: &[String],
    ) -> Result<LineageVerticesAndEdges> {
        let direction = match side {
            Side::Source => Direction::Upstream,
            Side::Destination => Direction::Downstream,
        };
        let expansion = self.traversal.bounded_repeat(start, direction, labels)?;
        cycle_guard::check_boundary(scope, &start.id, &expansion)?;

        let queried = self.mapper.to_lineage_vertex(start);
        let boundary: Vec<LineageVertex> = expansion
            .boundary
            .iter()
            .map(|v| self.mapper.to_lineage_vertex(v))
            .collect();
        Ok(condense(side, &queried, &boundary))
    }

    // -------------------------------------------------------------------
    // Scopes
    // -------------------------------------------------------------------

    /// Queried vertex, its roots, and a condensed node between them.
    pub fn ultimate_source(&self, guid: &str, labels: &[String]) -> Result<LineageVerticesAndEdges> {
        let start = self.start_vertex(guid)?;
        self.condensed_side(Scope::UltimateSource, &start, Side::Source, labels)
    }

    /// Queried vertex, its leaves, and a condensed node between them.
    pub fn ultimate_destination(&self, guid: &str, labels: &[String]) -> Result<LineageVerticesAndEdges> {
        let start = self.start_vertex(guid)?;
        self.condensed_side(Scope::UltimateDestination, &start, Side::Destination, labels)
    }

    /// Union of the ultimate-source and ultimate-destination results.
    pub fn source_and_destination(&self, guid: &str, labels: &[String]) -> Result<LineageVerticesAndEdges> {
        let start = self.start_vertex(guid)?;
        let scope = Scope::SourceAndDestination;
        let sources = self.condensed_side(scope, &start, Side::Source, labels)?;
        let destinations = self.condensed_side(scope, &start, Side::Destination, labels)?;
        Ok(sources.merge(destinations))
    }

    /// Every vertex and edge on a path from the queried vertex to one of
    /// its roots or leaves. No condensation.
    pub fn end_to_end(&self, guid: &str, labels: &[String]) -> Result<LineageVerticesAndEdges> {
        let start = self.start_vertex(guid)?;
        let mut result = LineageVerticesAndEdges::single(self.mapper.to_lineage_vertex(&start));

        for direction in [Direction::Upstream, Direction::Downstream] {
            let expansion = self.traversal.bounded_repeat(&start, direction, labels)?;
            cycle_guard::check_boundary(Scope::EndToEnd, guid, &expansion)?;
            result = result.merge(self.map_subgraph(&expansion.spanning()));
        }
        Ok(result)
    }

    /// Related glossary terms and the elements assigned to them.
    pub fn glossary(&self, guid: &str) -> Result<LineageVerticesAndEdges> {
        let start = self.start_vertex(guid)?;
        let (mut terms, limit_hit) = self
            .traversal
            .term_closure(&start, &self.glossary.term_edge_labels)?;
        cycle_guard::check_limit(Scope::Glossary, guid, limit_hit)?;

        let assignment = [self.glossary.assignment_edge_label.clone()];
        let term_ids: Vec<String> = terms.vertices.keys().cloned().collect();
        for term_id in term_ids {
            for edge in self.traversal.hop(&term_id, Direction::Upstream, &assignment)? {
                if !terms.vertices.contains_key(&edge.source) {
                    let Some(element) = self.traversal.vertex(&edge.source)? else {
                        continue;
                    };
                    terms.vertices.insert(element.id.clone(), element);
                }
                terms.edges.insert(edge);
            }
        }

        Ok(self.map_subgraph(&terms))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LineageConfig;
    use crate::graph::cancel::QueryContext;
    use crate::graph::memory::InMemoryGraph;
    use crate::types::{CONDENSED_DESTINATION_ID, CONDENSED_KIND, CONDENSED_SOURCE_ID};

    fn flow() -> Vec<String> {
        vec!["dataflow".to_string()]
    }

    fn ids(result: &LineageVerticesAndEdges) -> Vec<&str> {
        result.node_ids().into_iter().collect()
    }

    fn run<T>(graph: &InMemoryGraph, f: impl FnOnce(&ScopeResolver<'_>) -> T) -> T {
        let config = LineageConfig::default();
        let ctx = QueryContext::unbounded();
        let mapper = VertexMapper::from_config(&config.properties);
        let traversal = GraphTraversal::new(graph, config.traversal.limits(), &ctx);
        let resolver = ScopeResolver::new(traversal, &mapper, &config.glossary);
        f(&resolver)
    }

    /// a1 -> p -> c, a2 -> c, c -> d1, c -> q -> d2
    fn diamond() -> InMemoryGraph {
        let mut g = InMemoryGraph::new();
        g.add_vertex("a1", "table", "raw_orders")
            .add_vertex("a2", "table", "raw_customers")
            .add_vertex("p", "process", "load")
            .add_vertex("c", "table", "orders")
            .add_vertex("q", "process", "publish")
            .add_vertex("d1", "table", "report")
            .add_vertex("d2", "table", "dashboard")
            .add_edge("dataflow", "a1", "p")
            .add_edge("dataflow", "p", "c")
            .add_edge("dataflow", "a2", "c")
            .add_edge("dataflow", "c", "d1")
            .add_edge("dataflow", "c", "q")
            .add_edge("dataflow", "q", "d2");
        g
    }

    #[test]
    fn missing_start_is_node_not_found() {
        let g = diamond();
        let scopes: [fn(&ScopeResolver<'_>) -> Result<LineageVerticesAndEdges>; 5] = [
            |r: &ScopeResolver<'_>| r.ultimate_source("nope", &flow()),
            |r: &ScopeResolver<'_>| r.ultimate_destination("nope", &flow()),
            |r: &ScopeResolver<'_>| r.source_and_destination("nope", &flow()),
            |r: &ScopeResolver<'_>| r.end_to_end("nope", &flow()),
            |r: &ScopeResolver<'_>| r.glossary("nope"),
        ];
        for scope_fn in scopes {
            let err = run(&g, scope_fn).unwrap_err();
            assert!(matches!(err, LineageError::NodeNotFound { ref node_id } if node_id == "nope"));
        }
    }

    #[test]
    fn ultimate_source_condenses_two_roots() {
        let g = diamond();
        let r = run(&g, |r| r.ultimate_source("c", &flow())).unwrap();

        assert_eq!(ids(&r), vec![CONDENSED_SOURCE_ID, "a1", "a2", "c"]);
        assert!(r.contains_edge(CONDENSED_KIND, "a1", CONDENSED_SOURCE_ID));
        assert!(r.contains_edge(CONDENSED_KIND, "a2", CONDENSED_SOURCE_ID));
        assert!(r.contains_edge(CONDENSED_KIND, CONDENSED_SOURCE_ID, "c"));
        assert_eq!(r.edge_count(), 3);
    }

    #[test]
    fn ultimate_destination_condenses_leaves() {
        let g = diamond();
        let r = run(&g, |r| r.ultimate_destination("c", &flow())).unwrap();

        assert_eq!(ids(&r), vec![CONDENSED_DESTINATION_ID, "c", "d1", "d2"]);
        assert!(r.contains_edge(CONDENSED_KIND, "c", CONDENSED_DESTINATION_ID));
        assert!(r.contains_edge(CONDENSED_KIND, CONDENSED_DESTINATION_ID, "d2"));
    }

    #[test]
    fn root_queried_for_source_is_just_itself() {
        let g = diamond();
        let r = run(&g, |r| r.ultimate_source("a1", &flow())).unwrap();
        assert_eq!(ids(&r), vec!["a1"]);
        assert_eq!(r.edge_count(), 0);
    }

    #[test]
    fn source_and_destination_shares_queried_vertex() {
        let g = diamond();
        let r = run(&g, |r| r.source_and_destination("c", &flow())).unwrap();
        assert_eq!(
            ids(&r),
            vec![CONDENSED_DESTINATION_ID, CONDENSED_SOURCE_ID, "a1", "a2", "c", "d1", "d2"]
        );
        assert_eq!(r.edge_count(), 6);
        assert!(r.is_closed());
    }

    #[test]
    fn end_to_end_includes_intermediates() {
        let g = diamond();
        let r = run(&g, |r| r.end_to_end("p", &flow())).unwrap();
        assert_eq!(ids(&r), vec!["a1", "c", "d1", "d2", "p", "q"]);
        assert!(r.contains_edge("dataflow", "a1", "p"));
        assert!(r.contains_edge("dataflow", "q", "d2"));
        // a2 feeds c but is not upstream of p
        assert!(!r.contains_vertex("a2"));
        assert!(r.is_closed());
    }

    #[test]
    fn isolated_vertex_end_to_end_is_itself() {
        let mut g = diamond();
        g.add_vertex("lonely", "table", "lonely");
        let r = run(&g, |r| r.end_to_end("lonely", &flow())).unwrap();
        assert_eq!(ids(&r), vec!["lonely"]);
    }

    #[test]
    fn closed_cycle_trips_guard() {
        let mut g = InMemoryGraph::new();
        g.add_vertex("x", "table", "x")
            .add_vertex("y", "table", "y")
            .add_edge("dataflow", "x", "y")
            .add_edge("dataflow", "y", "x");

        let err = run(&g, |r| r.ultimate_source("x", &flow())).unwrap_err();
        assert!(matches!(
            err,
            LineageError::LineageCycle { scope: Scope::UltimateSource, ref guid, .. } if guid == "x"
        ));

        let err = run(&g, |r| r.end_to_end("x", &flow())).unwrap_err();
        assert!(matches!(err, LineageError::LineageCycle { scope: Scope::EndToEnd, .. }));
    }

    #[test]
    fn edge_from_missing_vertex_is_not_a_cycle() {
        let mut g = InMemoryGraph::new();
        g.add_vertex("q", "table", "q").add_edge("dataflow", "ghost", "q");

        let r = run(&g, |r| r.ultimate_source("q", &flow())).unwrap();
        assert_eq!(ids(&r), vec!["q"]);
        let r = run(&g, |r| r.end_to_end("q", &flow())).unwrap();
        assert_eq!(ids(&r), vec!["q"]);
        assert_eq!(r.edge_count(), 0);
    }

    #[test]
    fn dangling_edge_above_root_still_condenses() {
        let mut g = InMemoryGraph::new();
        g.add_vertex("r", "table", "r")
            .add_vertex("m", "table", "m")
            .add_vertex("q", "table", "q")
            .add_edge("dataflow", "ghost", "r")
            .add_edge("dataflow", "r", "m")
            .add_edge("dataflow", "m", "q");

        let r = run(&g, |r| r.ultimate_source("q", &flow())).unwrap();
        assert_eq!(ids(&r), vec![CONDENSED_SOURCE_ID, "q", "r"]);
        assert!(r.contains_edge(CONDENSED_KIND, "r", CONDENSED_SOURCE_ID));
        assert!(r.contains_edge(CONDENSED_KIND, CONDENSED_SOURCE_ID, "q"));
    }

    #[test]
    fn view_labels_restrict_traversal() {
        let mut g = diamond();
        g.add_vertex("h", "host", "warehouse")
            .add_edge("host-dataflow", "h", "c");
        let r = run(&g, |r| r.ultimate_source("c", &["host-dataflow".to_string()])).unwrap();
        assert_eq!(ids(&r), vec![CONDENSED_SOURCE_ID, "c", "h"]);
    }

    #[test]
    fn glossary_collects_related_terms_and_assets() {
        let mut g = InMemoryGraph::new();
        g.add_vertex("t-customer", "glossary-term", "Customer")
            .add_vertex("t-client", "glossary-term", "Client")
            .add_vertex("t-buyer", "glossary-term", "Buyer")
            .add_vertex("t-other", "glossary-term", "Invoice")
            .add_vertex("col1", "column", "customer_id")
            .add_vertex("col2", "column", "client_ref")
            .add_vertex("col3", "column", "invoice_no")
            .add_edge("synonym", "t-customer", "t-client")
            .add_edge("related-term", "t-buyer", "t-client")
            .add_edge("semantic-assignment", "col1", "t-customer")
            .add_edge("semantic-assignment", "col2", "t-client")
            .add_edge("semantic-assignment", "col3", "t-other");

        let r = run(&g, |r| r.glossary("t-client")).unwrap();

        assert_eq!(ids(&r), vec!["col1", "col2", "t-buyer", "t-client", "t-customer"]);
        assert!(r.contains_edge("semantic-assignment", "col1", "t-customer"));
        assert!(r.contains_edge("synonym", "t-customer", "t-client"));
        assert_eq!(r.edge_count(), 4);
        assert!(r.is_closed());
    }
}
