//! End-to-end lineage queries over the SQLite-backed graph store.
//!
//! Each test seeds an in-memory database with a small warehouse graph and
//! queries it through the public engine API.

use lineage_graph::config::schema::LineageConfig;
use lineage_graph::db::schema::initialize_database;
use lineage_graph::error::{ErrorKind, LineageError};
use lineage_graph::graph::adapter::{RawEdge, RawVertex};
use lineage_graph::graph::cancel::QueryContext;
use lineage_graph::graph::store::SqliteGraphStore;
use lineage_graph::lineage::LineageEngine;
use lineage_graph::types::{
    LineageQuery, LineageVerticesAndEdges, Scope, View, CONDENSED_DESTINATION_ID, CONDENSED_KIND,
    CONDENSED_SOURCE_ID,
};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn vertex(id: &str, label: &str, name: &str) -> RawVertex {
    RawVertex::new(id, label)
        .with_property("vedisplayName", name)
        .with_property("veguid", format!("guid-{id}"))
        .with_property("vepropqualifiedName", format!("dw.{name}"))
}

/// Column view:
///
/// ```text
/// crm.id ──> etl ──> stg.id ──> mart.id ──> report.id
/// erp.id ─────────────^             └──> sub ──> export.id
/// ```
///
/// plus a host-level edge crm-host -> dw-host and a column with no edges.
fn warehouse() -> SqliteGraphStore {
    let conn = initialize_database(":memory:").unwrap();
    let store = SqliteGraphStore::from_connection(conn);
    store
        .upsert_graph(
            &[
                vertex("crm.id", "column", "crm_customer_id"),
                vertex("erp.id", "column", "erp_customer_id"),
                vertex("etl", "process", "nightly_etl"),
                vertex("stg.id", "column", "stg_customer_id"),
                vertex("mart.id", "column", "mart_customer_id"),
                vertex("report.id", "column", "report_customer_id"),
                vertex("sub", "sub-process", "export_step"),
                vertex("export.id", "column", "export_customer_id"),
                vertex("orphan", "column", "unused_flag"),
                vertex("crm-host", "host", "crm_server"),
                vertex("dw-host", "host", "dw_server"),
            ],
            &[
                RawEdge::new("dataflow", "crm.id", "etl"),
                RawEdge::new("dataflow", "etl", "stg.id"),
                RawEdge::new("dataflow", "erp.id", "stg.id"),
                RawEdge::new("dataflow", "stg.id", "mart.id"),
                RawEdge::new("dataflow", "mart.id", "report.id"),
                RawEdge::new("dataflow", "mart.id", "sub"),
                RawEdge::new("dataflow", "sub", "export.id"),
                RawEdge::new("host-dataflow", "crm-host", "dw-host"),
            ],
        )
        .unwrap();
    store
}

fn query(store: &SqliteGraphStore, q: &LineageQuery) -> lineage_graph::Result<LineageVerticesAndEdges> {
    LineageEngine::new(store, LineageConfig::default()).query(q, &QueryContext::unbounded())
}

fn ids(result: &LineageVerticesAndEdges) -> Vec<&str> {
    result.node_ids().into_iter().collect()
}

// ===========================================================================
// Scopes
// ===========================================================================

#[test]
fn ultimate_source_of_mart_column() {
    let store = warehouse();
    let r = query(&store, &LineageQuery::new(Scope::UltimateSource, View::Column, "mart.id")).unwrap();

    assert_eq!(ids(&r), vec![CONDENSED_SOURCE_ID, "crm.id", "erp.id", "mart.id"]);
    assert!(r.contains_edge(CONDENSED_KIND, "crm.id", CONDENSED_SOURCE_ID));
    assert!(r.contains_edge(CONDENSED_KIND, "erp.id", CONDENSED_SOURCE_ID));
    assert!(r.contains_edge(CONDENSED_KIND, CONDENSED_SOURCE_ID, "mart.id"));
    assert_eq!(r.edge_count(), 3);
}

#[test]
fn ultimate_destination_of_staging_column() {
    let store = warehouse();
    let r = query(&store, &LineageQuery::new(Scope::UltimateDestination, View::Column, "stg.id")).unwrap();

    assert_eq!(
        ids(&r),
        vec![CONDENSED_DESTINATION_ID, "export.id", "report.id", "stg.id"]
    );
    assert_eq!(r.edge_count(), 3);
}

#[test]
fn source_and_destination_is_union_of_both_sides() {
    let store = warehouse();
    let both = query(&store, &LineageQuery::new(Scope::SourceAndDestination, View::Column, "stg.id")).unwrap();
    let src = query(&store, &LineageQuery::new(Scope::UltimateSource, View::Column, "stg.id")).unwrap();
    let dst = query(&store, &LineageQuery::new(Scope::UltimateDestination, View::Column, "stg.id")).unwrap();

    assert_eq!(both, src.merge(dst));
    assert_eq!(both.vertex_count(), 7);
    assert!(both.is_closed());
}

#[test]
fn end_to_end_returns_every_hop() {
    let store = warehouse();
    let r = query(&store, &LineageQuery::new(Scope::EndToEnd, View::Column, "stg.id")).unwrap();

    assert_eq!(
        ids(&r),
        vec!["crm.id", "erp.id", "etl", "export.id", "mart.id", "report.id", "stg.id", "sub"]
    );
    assert_eq!(r.edge_count(), 7);
    assert!(!r.vertices().any(|v| v.is_condensed()));
}

#[test]
fn end_to_end_without_processes_drops_their_edges() {
    let store = warehouse();
    let q = LineageQuery::new(Scope::EndToEnd, View::Column, "stg.id").include_processes(false);
    let r = query(&store, &q).unwrap();

    assert!(!r.contains_vertex("etl"));
    assert!(!r.contains_vertex("sub"));
    assert!(!r.contains_edge("dataflow", "crm.id", "etl"));
    assert!(r.contains_edge("dataflow", "erp.id", "stg.id"));
    assert_eq!(r.edge_count(), 3);
    assert!(r.is_closed());
}

#[test]
fn display_name_filter_applies_to_condensed_result() {
    let store = warehouse();
    let q = LineageQuery::new(Scope::UltimateSource, View::Column, "mart.id").display_name_must_contain("crm");
    let r = query(&store, &q).unwrap();

    assert_eq!(ids(&r), vec!["crm.id"]);
    assert_eq!(r.edge_count(), 0);
}

#[test]
fn orphan_is_its_own_lineage() {
    let store = warehouse();
    for scope in Scope::ALL {
        if scope == Scope::Glossary {
            continue;
        }
        let r = query(&store, &LineageQuery::new(scope, View::Column, "orphan")).unwrap();
        assert_eq!(ids(&r), vec!["orphan"], "scope {scope}");
    }
}

#[test]
fn host_view_uses_host_edges_only() {
    let store = warehouse();
    let r = query(&store, &LineageQuery::new(Scope::UltimateSource, View::Host, "dw-host")).unwrap();
    assert_eq!(ids(&r), vec![CONDENSED_SOURCE_ID, "crm-host", "dw-host"]);

    let r = query(&store, &LineageQuery::new(Scope::UltimateSource, View::Host, "mart.id")).unwrap();
    assert_eq!(ids(&r), vec!["mart.id"]);
}

#[test]
fn vertices_carry_public_properties() {
    let store = warehouse();
    let r = query(&store, &LineageQuery::new(Scope::UltimateSource, View::Column, "mart.id")).unwrap();

    let root = r.vertex("crm.id").unwrap();
    assert_eq!(root.kind, "column");
    assert_eq!(root.display_name.as_deref(), Some("crm_customer_id"));
    assert_eq!(root.entity_guid.as_deref(), Some("guid-crm.id"));
    assert_eq!(
        root.properties.get("qualifiedName").map(String::as_str),
        Some("dw.crm_customer_id")
    );
    assert!(!root.properties.contains_key("veguid"));
}

// ===========================================================================
// Failures
// ===========================================================================

#[test]
fn unknown_start_is_client_input() {
    let store = warehouse();
    let err = query(&store, &LineageQuery::new(Scope::EndToEnd, View::Column, "ghost")).unwrap_err();
    assert!(matches!(err, LineageError::NodeNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::ClientInput);
}

#[test]
fn cycle_without_root_is_data_integrity_error() {
    let store = warehouse();
    store
        .upsert_graph(
            &[vertex("loop.a", "column", "loop_a"), vertex("loop.b", "column", "loop_b")],
            &[
                RawEdge::new("dataflow", "loop.a", "loop.b"),
                RawEdge::new("dataflow", "loop.b", "loop.a"),
            ],
        )
        .unwrap();

    for scope in [Scope::UltimateSource, Scope::UltimateDestination, Scope::EndToEnd] {
        let err = query(&store, &LineageQuery::new(scope, View::Column, "loop.a")).unwrap_err();
        assert!(
            matches!(err, LineageError::LineageCycle { scope: s, .. } if s == scope),
            "scope {scope}: {err}"
        );
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    }
}

#[test]
fn cycle_with_an_exit_still_resolves() {
    let store = warehouse();
    // stg.id <-> mart.id loop; crm.id and erp.id remain roots
    store
        .upsert_edge(&RawEdge::new("dataflow", "mart.id", "stg.id"))
        .unwrap();

    let r = query(&store, &LineageQuery::new(Scope::UltimateSource, View::Column, "mart.id")).unwrap();
    assert_eq!(ids(&r), vec![CONDENSED_SOURCE_ID, "crm.id", "erp.id", "mart.id"]);
}

#[test]
fn edges_to_unstored_vertices_are_ignored() {
    let store = warehouse();
    // written before their far endpoints were ingested
    store
        .upsert_edge(&RawEdge::new("dataflow", "upstream.pending", "crm.id"))
        .unwrap();
    store
        .upsert_edge(&RawEdge::new("dataflow", "report.id", "downstream.pending"))
        .unwrap();

    let r = query(&store, &LineageQuery::new(Scope::UltimateSource, View::Column, "mart.id")).unwrap();
    assert_eq!(ids(&r), vec![CONDENSED_SOURCE_ID, "crm.id", "erp.id", "mart.id"]);

    let r = query(&store, &LineageQuery::new(Scope::EndToEnd, View::Column, "crm.id")).unwrap();
    assert!(r.contains_vertex("report.id"));
    assert!(!r.contains_vertex("downstream.pending"));
    assert!(!r.contains_vertex("upstream.pending"));
    assert!(r.is_closed());
}

// ===========================================================================
// Glossary
// ===========================================================================

#[test]
fn glossary_returns_terms_and_assigned_columns() {
    let store = warehouse();
    store
        .upsert_graph(
            &[
                vertex("term.customer", "glossary-term", "Customer"),
                vertex("term.client", "glossary-term", "Client"),
            ],
            &[
                RawEdge::new("synonym", "term.client", "term.customer"),
                RawEdge::new("semantic-assignment", "crm.id", "term.customer"),
                RawEdge::new("semantic-assignment", "erp.id", "term.client"),
            ],
        )
        .unwrap();

    let r = query(&store, &LineageQuery::new(Scope::Glossary, View::Column, "term.customer")).unwrap();
    assert_eq!(ids(&r), vec!["crm.id", "erp.id", "term.client", "term.customer"]);
    assert_eq!(r.edge_count(), 3);

    let q = LineageQuery::new(Scope::Glossary, View::Column, "term.customer").display_name_must_contain("Cl");
    let filtered = query(&store, &q).unwrap();
    assert_eq!(ids(&filtered), vec!["term.client"]);
}
