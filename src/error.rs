//! Crate-wide error type.
//!
//! Every fallible operation returns [`Result`]. Storage, serialization and
//! I/O errors convert via `#[from]`, so `?` works across layers.

use thiserror::Error;

use crate::types::Scope;

/// All failures the lineage engine and its collaborators can surface.
#[derive(Debug, Error)]
pub enum LineageError {
    /// The starting identifier does not resolve to any vertex.
    #[error("node not found: {node_id}")]
    NodeNotFound { node_id: String },

    /// The cycle guard tripped: no terminal vertex is reachable.
    #[error("lineage cycle detected for {scope} lineage of {guid}: {reason}")]
    LineageCycle {
        scope: Scope,
        guid: String,
        reason: String,
    },

    /// The caller's deadline elapsed mid-traversal.
    #[error("traversal exceeded its {budget_ms} ms deadline")]
    TraversalTimeout { budget_ms: u64 },

    /// The caller cancelled the query mid-traversal.
    #[error("traversal cancelled")]
    Cancelled,

    #[error("unknown lineage scope: {0}")]
    UnknownScope(String),

    #[error("unknown lineage view: {0}")]
    UnknownView(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification a service layer can map onto status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input from the caller (unknown node, scope or view).
    ClientInput,
    /// The stored graph has a structure the engine refuses to resolve.
    DataIntegrity,
    /// Deadline or cancellation stopped the query.
    Interrupted,
    /// Storage, serialization or configuration failure.
    Internal,
}

impl LineageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NodeNotFound { .. } | Self::UnknownScope(_) | Self::UnknownView(_) => {
                ErrorKind::ClientInput
            }
            Self::LineageCycle { .. } => ErrorKind::DataIntegrity,
            Self::TraversalTimeout { .. } | Self::Cancelled => ErrorKind::Interrupted,
            Self::Sqlite(_)
            | Self::Json(_)
            | Self::Yaml(_)
            | Self::Io(_)
            | Self::Config(_)
            | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, LineageError>;
