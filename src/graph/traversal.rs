//! Bounded graph traversals over any [`GraphAdapter`].
//!
//! `bounded_repeat` follows edges of a view in one direction until no
//! further edge exists, returning the boundary (roots or leaves) together
//! with everything visited on the way. A visited set guarantees that every
//! vertex is expanded at most once, so cyclic graphs terminate; hard depth
//! and vertex bounds stop pathological graphs and are reported back to the
//! caller instead of failing here.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use crate::error::Result;
use crate::graph::adapter::{Direction, GraphAdapter, RawEdge, RawVertex};
use crate::graph::cancel::QueryContext;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Hard bounds applied to every traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalLimits {
    /// Maximum number of hops from the starting vertex.
    pub max_depth: u32,
    /// Maximum number of distinct vertices visited.
    pub max_vertices: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            max_vertices: 100_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Vertices and edges collected by a traversal, keyed for deduplication.
#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    pub vertices: BTreeMap<String, RawVertex>,
    pub edges: BTreeSet<RawEdge>,
}

/// Outcome of a [`GraphTraversal::bounded_repeat`].
#[derive(Debug, Clone)]
pub struct Expansion {
    pub start_id: String,
    pub direction: Direction,
    /// Vertices with no further edge in `direction`, ordered by ID.
    ///
    /// Holds only the starting vertex when it has no edge at all.
    pub boundary: Vec<RawVertex>,
    /// Everything visited, starting vertex included.
    pub reached: Subgraph,
    /// Set when a depth or vertex bound stopped the traversal early.
    pub limit_hit: Option<String>,
}

impl Expansion {
    /// True when the starting vertex has no edge in the traversal direction.
    pub fn is_trivial(&self) -> bool {
        self.boundary.len() == 1 && self.boundary[0].id == self.start_id
    }

    /// The part of the reached subgraph that lies on a path from the start
    /// to some boundary vertex.
    ///
    /// Vertices that only lead into cycles with no exit are dropped along
    /// with their edges. Edges between kept vertices are all kept, so a
    /// cycle that has an exit shows up whole, back edge included.
    pub fn spanning(&self) -> Subgraph {
        let boundary_ids: HashSet<&str> = self.boundary.iter().map(|v| v.id.as_str()).collect();

        // far → near: walk back from the boundary towards the start.
        let mut towards_start: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.reached.edges {
            towards_start
                .entry(edge.far_end(self.direction))
                .or_default()
                .push(edge.near_end(self.direction));
        }

        let mut keep: HashSet<&str> = boundary_ids.clone();
        let mut queue: VecDeque<&str> = boundary_ids.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            if let Some(nears) = towards_start.get(id) {
                for &near in nears {
                    if keep.insert(near) {
                        queue.push_back(near);
                    }
                }
            }
        }

        let vertices = self
            .reached
            .vertices
            .iter()
            .filter(|(id, _)| keep.contains(id.as_str()))
            .map(|(id, v)| (id.clone(), v.clone()))
            .collect();
        let edges = self
            .reached
            .edges
            .iter()
            .filter(|e| keep.contains(e.source.as_str()) && keep.contains(e.target.as_str()))
            .cloned()
            .collect();
        Subgraph { vertices, edges }
    }
}

// ---------------------------------------------------------------------------
// GraphTraversal
// ---------------------------------------------------------------------------

/// Bounded traversal algorithms over a graph adapter.
///
/// Every hop first checks the query context, so deadlines and
/// cancellation interrupt long traversals promptly.
pub struct GraphTraversal<'a> {
    graph: &'a dyn GraphAdapter,
    limits: TraversalLimits,
    ctx: &'a QueryContext,
}

impl<'a> GraphTraversal<'a> {
    pub fn new(graph: &'a dyn GraphAdapter, limits: TraversalLimits, ctx: &'a QueryContext) -> Self {
        Self { graph, limits, ctx }
    }

    /// Look up a vertex, checking for interruption first.
    pub fn vertex(&self, id: &str) -> Result<Option<RawVertex>> {
        self.ctx.check()?;
        self.graph.get_vertex(id)
    }

    /// Single-hop edges, checking for interruption first.
    pub fn hop(&self, id: &str, direction: Direction, labels: &[String]) -> Result<Vec<RawEdge>> {
        self.ctx.check()?;
        self.graph.edges(id, direction, labels)
    }

    // -------------------------------------------------------------------
    // bounded_repeat
    // -------------------------------------------------------------------

    /// Repeatedly follow `labels` edges in `direction` from `start` until
    /// no further edge exists.
    ///
    /// Edges whose far endpoint is not a stored vertex are skipped, and a
    /// vertex whose only edges are such dangling ones is part of the
    /// boundary.
    pub fn bounded_repeat(
        &self,
        start: &RawVertex,
        direction: Direction,
        labels: &[String],
    ) -> Result<Expansion> {
        let mut reached = Subgraph::default();
        reached.vertices.insert(start.id.clone(), start.clone());

        let mut boundary: Vec<RawVertex> = Vec::new();
        let mut limit_hit = None;
        let mut queue: VecDeque<(RawVertex, u32)> = VecDeque::new();
        queue.push_back((start.clone(), 0));

        'walk: while let Some((current, depth)) = queue.pop_front() {
            let mut known = Vec::new();
            let mut fresh = Vec::new();
            for edge in self.hop(&current.id, direction, labels)? {
                let far_id = edge.far_end(direction);
                if reached.vertices.contains_key(far_id) {
                    known.push(edge);
                    continue;
                }
                match self.vertex(far_id)? {
                    Some(far) => fresh.push((edge, far)),
                    None => tracing::debug!(edge = ?edge, "skipping edge to missing vertex"),
                }
            }
            if known.is_empty() && fresh.is_empty() {
                boundary.push(current);
                continue;
            }
            if depth >= self.limits.max_depth {
                limit_hit = Some(format!(
                    "{direction} traversal exceeded {} hops at {}",
                    self.limits.max_depth, current.id
                ));
                break;
            }

            reached.edges.extend(known);
            for (edge, far) in fresh {
                if reached.vertices.contains_key(&far.id) {
                    reached.edges.insert(edge);
                    continue;
                }
                if reached.vertices.len() >= self.limits.max_vertices {
                    limit_hit = Some(format!(
                        "{direction} traversal visited more than {} vertices",
                        self.limits.max_vertices
                    ));
                    break 'walk;
                }
                reached.vertices.insert(far.id.clone(), far.clone());
                reached.edges.insert(edge);
                queue.push_back((far, depth + 1));
            }
        }

        boundary.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Expansion {
            start_id: start.id.clone(),
            direction,
            boundary,
            reached,
            limit_hit,
        })
    }

    // -------------------------------------------------------------------
    // term_closure
    // -------------------------------------------------------------------

    /// Follow `labels` edges in either direction, any number of hops.
    ///
    /// Returns every vertex connected to `start` (inclusive) plus the edges
    /// used, and a limit message if the vertex bound stopped the walk.
    pub fn term_closure(&self, start: &RawVertex, labels: &[String]) -> Result<(Subgraph, Option<String>)> {
        let mut reached = Subgraph::default();
        reached.vertices.insert(start.id.clone(), start.clone());
        let mut queue: VecDeque<String> = VecDeque::from([start.id.clone()]);

        while let Some(current) = queue.pop_front() {
            let mut edges = self.hop(&current, Direction::Downstream, labels)?;
            edges.extend(self.hop(&current, Direction::Upstream, labels)?);

            for edge in edges {
                let other = if edge.source == current {
                    edge.target.clone()
                } else {
                    edge.source.clone()
                };
                if reached.vertices.contains_key(&other) {
                    reached.edges.insert(edge);
                    continue;
                }
                let Some(vertex) = self.vertex(&other)? else {
                    continue;
                };
                if reached.vertices.len() >= self.limits.max_vertices {
                    let msg = format!(
                        "term traversal visited more than {} vertices",
                        self.limits.max_vertices
                    );
                    return Ok((reached, Some(msg)));
                }
                reached.vertices.insert(other.clone(), vertex);
                reached.edges.insert(edge);
                queue.push_back(other);
            }
        }

        Ok((reached, None))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
