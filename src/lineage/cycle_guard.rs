//! Fail fast when a boundary traversal cannot reach a terminal vertex.

use crate::error::{LineageError, Result};
use crate::graph::traversal::Expansion;
use crate::types::Scope;

/// Reject an expansion that hit a traversal bound or found no boundary.
///
/// An empty boundary means the starting vertex has edges in the traversal
/// direction, yet every vertex reached also has one: the data only flows
/// around a cycle and never reaches a root (or leaf).
pub fn check_boundary(scope: Scope, guid: &str, expansion: &Expansion) -> Result<()> {
    if let Some(reason) = &expansion.limit_hit {
        return Err(trip(scope, guid, reason.clone()));
    }
    if expansion.boundary.is_empty() {
        let reason = format!(
            "no vertex without further {} edges is reachable from {}",
            expansion.direction, expansion.start_id
        );
        return Err(trip(scope, guid, reason));
    }
    Ok(())
}

/// Reject a traversal stopped by a bound (glossary closure).
pub fn check_limit(scope: Scope, guid: &str, limit_hit: Option<String>) -> Result<()> {
    match limit_hit {
        Some(reason) => Err(trip(scope, guid, reason)),
        None => Ok(()),
    }
}

fn trip(scope: Scope, guid: &str, reason: String) -> LineageError {
    tracing::warn!(%scope, guid, %reason, "lineage cycle guard tripped");
    LineageError::LineageCycle {
        scope,
        guid: guid.to_string(),
        reason,
    }
}
