//! Lineage Graph: data lineage queries over a property graph.
//!
//! Given a starting element, resolves its ultimate sources, ultimate
//! destinations, full end-to-end flow, or related glossary terms, with
//! long intermediate chains condensed into a single synthetic vertex.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod graph;
pub mod lineage;
pub mod observability;
pub mod types;

pub use error::{LineageError, Result};
pub use graph::adapter::GraphAdapter;
pub use graph::cancel::{CancellationToken, QueryContext};
pub use lineage::LineageEngine;
pub use types::{LineageQuery, LineageVerticesAndEdges, Scope, View};
