//! SQLite schema for the persisted lineage property graph.
//!
//! Vertices carry a label and a JSON bag of string properties; edges are
//! labeled, directed, and unique per `(source_id, target_id, label)`.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants
// ---------------------------------------------------------------------------

const CREATE_VERTICES: &str = "\
CREATE TABLE IF NOT EXISTS vertices (
  id TEXT PRIMARY KEY,
  label TEXT NOT NULL,
  properties TEXT NOT NULL DEFAULT '{}'
)";

const CREATE_EDGES: &str = "\
CREATE TABLE IF NOT EXISTS edges (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  source_id TEXT NOT NULL,
  target_id TEXT NOT NULL,
  label TEXT NOT NULL,
  UNIQUE (source_id, target_id, label)
)";

// Indexes ----------------------------------------------------------------

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_vertices_label ON vertices(label)",
    "CREATE INDEX IF NOT EXISTS idx_edges_source_label ON edges(source_id, label)",
    "CREATE INDEX IF NOT EXISTS idx_edges_target_label ON edges(target_id, label)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) the SQLite database at `db_path` and apply the lineage
/// graph schema.
///
/// The returned connection has WAL mode and synchronous NORMAL configured.
/// Foreign keys stay off: ingestion may write an edge before both of its
/// endpoint vertices exist.
///
/// # Errors
///
/// Returns a `rusqlite::Error` if the database cannot be opened or any DDL
/// statement fails.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    // -- Pragmas ----------------------------------------------------------
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "OFF")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    // -- Core tables ------------------------------------------------------
    conn.execute_batch(CREATE_VERTICES)?;
    conn.execute_batch(CREATE_EDGES)?;

    // -- Indexes ----------------------------------------------------------
    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }

    Ok(conn)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
