//! SQLite-backed lineage graph store.
//!
//! Uses `rusqlite` with `prepare_cached` for automatic statement caching.
//! The connection sits behind a mutex so one store can serve concurrent
//! read-only queries.

use std::sync::{Mutex, MutexGuard};

use rusqlite::types::ToSql;
use rusqlite::{params, Connection};

use crate::db::converters::{row_to_raw_edge, row_to_raw_vertex};
use crate::db::schema::initialize_database;
use crate::error::Result;
use crate::graph::adapter::{GraphAdapter, RawEdge, RawVertex};

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Aggregate counts for the stored graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub vertices: usize,
    pub edges: usize,
}

// ---------------------------------------------------------------------------
// SqliteGraphStore
// ---------------------------------------------------------------------------

/// Typed wrapper around the lineage graph SQLite database.
pub struct SqliteGraphStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteGraphStore").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const UPSERT_VERTEX_SQL: &str = "\
INSERT INTO vertices (id, label, properties)
VALUES (?1, ?2, ?3)
ON CONFLICT(id) DO UPDATE SET
  label = excluded.label,
  properties = excluded.properties";

const INSERT_EDGE_SQL: &str = "\
INSERT INTO edges (source_id, target_id, label)
VALUES (?1, ?2, ?3)
ON CONFLICT(source_id, target_id, label) DO NOTHING";

/// Build a single-hop edge query with one placeholder per label.
///
/// `endpoint_column` is the column matched against `?1`.
fn edges_by_label_sql(endpoint_column: &str, label_count: usize) -> String {
    let placeholders: String = (0..label_count)
        .map(|i| format!("?{}", i + 2))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "SELECT source_id, target_id, label FROM edges \
         WHERE {endpoint_column} = ?1 AND label IN ({placeholders}) \
         ORDER BY label ASC, source_id ASC, target_id ASC"
    )
}

// ---------------------------------------------------------------------------
// Implementation
// ---------------------------------------------------------------------------

impl SqliteGraphStore {
    /// Open (or create) the database at `db_path` and apply the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = initialize_database(db_path)?;
        tracing::info!(db = db_path, "opened lineage graph store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Wrap an already-initialized connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    // -------------------------------------------------------------------
    // Mutations (fixtures and restore only)
    // -------------------------------------------------------------------

    /// Insert or update a single vertex.
    pub fn upsert_vertex(&self, vertex: &RawVertex) -> Result<()> {
        let properties = serde_json::to_string(&vertex.properties)?;
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(UPSERT_VERTEX_SQL)?;
        stmt.execute(params![vertex.id, vertex.label, properties])?;
        Ok(())
    }

    /// Insert a single edge; an existing identical triple is left alone.
    pub fn upsert_edge(&self, edge: &RawEdge) -> Result<()> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(INSERT_EDGE_SQL)?;
        stmt.execute(params![edge.source, edge.target, edge.label])?;
        Ok(())
    }

    /// Load vertices and edges inside a single transaction.
    pub fn upsert_graph(&self, vertices: &[RawVertex], edges: &[RawEdge]) -> Result<()> {
        let conn = self.lock();
        let tx = conn.unchecked_transaction()?;
        {
            let mut ins_vertex = tx.prepare_cached(UPSERT_VERTEX_SQL)?;
            for vertex in vertices {
                let properties = serde_json::to_string(&vertex.properties)?;
                ins_vertex.execute(params![vertex.id, vertex.label, properties])?;
            }

            let mut ins_edge = tx.prepare_cached(INSERT_EDGE_SQL)?;
            for edge in edges {
                ins_edge.execute(params![edge.source, edge.target, edge.label])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Queries: aggregate counts
    // -------------------------------------------------------------------

    pub fn get_stats(&self) -> Result<GraphStats> {
        let conn = self.lock();
        let vertices: i64 = conn
            .prepare_cached("SELECT count(*) FROM vertices")?
            .query_row([], |row| row.get(0))?;
        let edges: i64 = conn
            .prepare_cached("SELECT count(*) FROM edges")?
            .query_row([], |row| row.get(0))?;
        Ok(GraphStats {
            vertices: vertices as usize,
            edges: edges as usize,
        })
    }

    fn edges_matching(&self, endpoint_column: &str, vertex_id: &str, labels: &[String]) -> Result<Vec<RawEdge>> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let sql = edges_by_label_sql(endpoint_column, labels.len());
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(&sql)?;

        let mut param_values: Vec<&dyn ToSql> = Vec::with_capacity(labels.len() + 1);
        param_values.push(&vertex_id);
        for label in labels {
            param_values.push(label);
        }

        let rows = stmt.query_and_then(param_values.as_slice(), row_to_raw_edge)?;
        let edges = rows.collect::<Result<Vec<_>>>()?;
        Ok(edges)
    }
}

impl GraphAdapter for SqliteGraphStore {
    fn get_vertex(&self, id: &str) -> Result<Option<RawVertex>> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached("SELECT id, label, properties FROM vertices WHERE id = ?1")?;
        let mut rows = stmt.query_and_then(params![id], row_to_raw_vertex)?;
        let vertex = match rows.next() {
            Some(Ok(vertex)) => Some(vertex),
            Some(Err(e)) => return Err(e),
            None => None,
        };
        Ok(vertex)
    }

    fn out_edges(&self, vertex_id: &str, labels: &[String]) -> Result<Vec<RawEdge>> {
        self.edges_matching("source_id", vertex_id, labels)
    }

    fn in_edges(&self, vertex_id: &str, labels: &[String]) -> Result<Vec<RawEdge>> {
        self.edges_matching("target_id", vertex_id, labels)
    }

    fn all_vertices(&self) -> Result<Vec<RawVertex>> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached("SELECT id, label, properties FROM vertices ORDER BY id ASC")?;
        let rows = stmt.query_and_then([], row_to_raw_vertex)?;
        let vertices = rows.collect::<Result<Vec<_>>>()?;
        Ok(vertices)
    }

    fn all_edges(&self) -> Result<Vec<RawEdge>> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT source_id, target_id, label FROM edges ORDER BY label ASC, source_id ASC, target_id ASC",
        )?;
        let rows = stmt.query_and_then([], row_to_raw_edge)?;
        let edges = rows.collect::<Result<Vec<_>>>()?;
        Ok(edges)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
