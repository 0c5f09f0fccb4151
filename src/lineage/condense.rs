//! Collapse the chain between a boundary set and the queried vertex into
//! one synthetic vertex.
//!
//! The response holds at most `|boundary| + 2` vertices per side, however
//! many hops separate the boundary from the queried element.

use crate::types::{
    LineageEdge, LineageVertex, LineageVerticesAndEdges, CONDENSED_DESTINATION_ID, CONDENSED_KIND,
    CONDENSED_SOURCE_ID,
};

/// Which end of the queried vertex a condensed chain sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl Side {
    pub fn condensed_id(&self) -> &'static str {
        match self {
            Self::Source => CONDENSED_SOURCE_ID,
            Self::Destination => CONDENSED_DESTINATION_ID,
        }
    }

    /// A `condensed` edge oriented along the data flow of this side.
    fn edge(&self, from: &str, to: &str) -> LineageEdge {
        match self {
            Self::Source => LineageEdge::new(CONDENSED_KIND, from, to),
            Self::Destination => LineageEdge::new(CONDENSED_KIND, to, from),
        }
    }
}

/// Build the condensed subgraph for one side of `queried`.
///
/// Source side: `boundary → condensed → queried`.
/// Destination side: `queried → condensed → boundary`.
/// When the boundary is just the queried vertex (or empty) nothing is
/// condensed and the result is the queried vertex alone.
pub fn condense(side: Side, queried: &LineageVertex, boundary: &[LineageVertex]) -> LineageVerticesAndEdges {
    let mut result = LineageVerticesAndEdges::single(queried.clone());

    let nothing_beyond = boundary.iter().all(|v| v.node_id == queried.node_id);
    if nothing_beyond {
        return result;
    }

    let condensed = LineageVertex::condensed(side.condensed_id());
    for vertex in boundary {
        result.insert_vertex(vertex.clone());
        result.insert_edge(side.edge(&vertex.node_id, &condensed.node_id));
    }
    result.insert_edge(side.edge(&condensed.node_id, &queried.node_id));
    result.insert_vertex(condensed);
    result
}
