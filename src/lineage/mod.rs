//! Lineage query engine.
//!
//! [`LineageEngine::query`] resolves one scope from a starting vertex and
//! runs the post-filters over the assembled result:
//!
//! 1. the scope resolver walks the graph under the view's edge labels,
//! 2. process and sub-process vertices are dropped unless requested,
//! 3. vertices whose display name lacks the requested substring are dropped.
//!
//! Every call builds a fresh result; the engine holds no per-query state
//! and may be shared between threads.

pub mod abstraction;
pub mod condense;
pub mod cycle_guard;
pub mod filters;
pub mod resolvers;

use crate::config::schema::LineageConfig;
use crate::error::Result;
use crate::graph::adapter::GraphAdapter;
use crate::graph::cancel::QueryContext;
use crate::graph::traversal::GraphTraversal;
use crate::types::{LineageQuery, LineageVerticesAndEdges, Scope, View};

use abstraction::VertexMapper;
use resolvers::ScopeResolver;

pub struct LineageEngine<'g> {
    graph: &'g dyn GraphAdapter,
    config: LineageConfig,
    mapper: VertexMapper,
}

impl<'g> LineageEngine<'g> {
    pub fn new(graph: &'g dyn GraphAdapter, config: LineageConfig) -> Self {
        let mapper = VertexMapper::from_config(&config.properties);
        Self {
            graph,
            config,
            mapper,
        }
    }

    /// Resolve `scope` without post-filtering.
    pub fn resolve(
        &self,
        scope: Scope,
        view: View,
        guid: &str,
        ctx: &QueryContext,
    ) -> Result<LineageVerticesAndEdges> {
        let traversal = GraphTraversal::new(self.graph, self.config.traversal.limits(), ctx);
        let resolver = ScopeResolver::new(traversal, &self.mapper, &self.config.glossary);
        let labels = self.config.views.labels(view);

        match scope {
            Scope::UltimateSource => resolver.ultimate_source(guid, labels),
            Scope::UltimateDestination => resolver.ultimate_destination(guid, labels),
            Scope::EndToEnd => resolver.end_to_end(guid, labels),
            Scope::SourceAndDestination => resolver.source_and_destination(guid, labels),
            Scope::Glossary => resolver.glossary(guid),
        }
    }

    /// Resolve and filter one lineage query.
    pub fn query(&self, query: &LineageQuery, ctx: &QueryContext) -> Result<LineageVerticesAndEdges> {
        tracing::debug!(
            scope = %query.scope,
            view = %query.view,
            guid = %query.starting_node_id,
            "resolving lineage"
        );

        let resolved = self
            .resolve(query.scope, query.view, &query.starting_node_id, ctx)
            .inspect_err(|e| tracing::debug!(error = %e, "lineage query failed"))?;

        let result = filters::filter_processes(resolved, query.include_processes);
        let result = filters::filter_display_name(result, &query.display_name_must_contain);

        tracing::debug!(
            vertices = result.vertex_count(),
            edges = result.edge_count(),
            "lineage resolved"
        );
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
