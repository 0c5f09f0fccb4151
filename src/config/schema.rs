//! Configuration data structures for the lineage engine.
//!
//! Defines the YAML config format: per-view edge labels, glossary labels,
//! the vertex property allow-list, and traversal bounds. Every field has a
//! default, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::graph::traversal::TraversalLimits;
use crate::types::View;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub views: ViewsConfig,

    #[serde(default)]
    pub glossary: GlossaryConfig,

    #[serde(default)]
    pub properties: PropertiesConfig,

    #[serde(default)]
    pub traversal: TraversalConfig,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            views: ViewsConfig::default(),
            glossary: GlossaryConfig::default(),
            properties: PropertiesConfig::default(),
            traversal: TraversalConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ViewsConfig
// ---------------------------------------------------------------------------

/// Edge labels traversable under each view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewsConfig {
    #[serde(default = "default_host_labels")]
    pub host: Vec<String>,
    #[serde(default = "default_table_labels")]
    pub table: Vec<String>,
    #[serde(default = "default_column_labels")]
    pub column: Vec<String>,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            host: default_host_labels(),
            table: default_table_labels(),
            column: default_column_labels(),
        }
    }
}

impl ViewsConfig {
    pub fn labels(&self, view: View) -> &[String] {
        match view {
            View::Host => &self.host,
            View::Table => &self.table,
            View::Column => &self.column,
        }
    }
}

// ---------------------------------------------------------------------------
// GlossaryConfig
// ---------------------------------------------------------------------------

/// Edge labels used by the glossary scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryConfig {
    /// Term-to-term relationships followed in either direction.
    #[serde(default = "default_term_edge_labels")]
    pub term_edge_labels: Vec<String>,

    /// Edge from a described element to the term describing it.
    #[serde(default = "default_assignment_edge_label")]
    pub assignment_edge_label: String,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            term_edge_labels: default_term_edge_labels(),
            assignment_edge_label: default_assignment_edge_label(),
        }
    }
}

// ---------------------------------------------------------------------------
// PropertiesConfig
// ---------------------------------------------------------------------------

/// How raw vertex properties map onto lineage vertices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertiesConfig {
    /// Property holding the global identifier into the metadata repository.
    #[serde(default = "default_guid_key")]
    pub guid_key: String,

    /// Display-name properties, tried in order; first match wins.
    #[serde(default = "default_display_name_keys")]
    pub display_name_keys: Vec<String>,

    /// Raw property keys copied onto lineage vertices.
    #[serde(default = "default_allowed_keys")]
    pub allowed_keys: Vec<String>,

    /// Internal prefixes stripped from copied keys (longest match first).
    #[serde(default = "default_strip_prefixes")]
    pub strip_prefixes: Vec<String>,
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            guid_key: default_guid_key(),
            display_name_keys: default_display_name_keys(),
            allowed_keys: default_allowed_keys(),
            strip_prefixes: default_strip_prefixes(),
        }
    }
}

// ---------------------------------------------------------------------------
// TraversalConfig
// ---------------------------------------------------------------------------

/// Traversal bounds and the default per-query deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    #[serde(default = "default_max_vertices")]
    pub max_vertices: usize,

    /// Deadline applied by callers that do not supply their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_vertices: default_max_vertices(),
            timeout_ms: None,
        }
    }
}

impl TraversalConfig {
    pub fn limits(&self) -> TraversalLimits {
        TraversalLimits {
            max_depth: self.max_depth,
            max_vertices: self.max_vertices,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_host_labels() -> Vec<String> {
    strings(&["host-dataflow"])
}

fn default_table_labels() -> Vec<String> {
    strings(&["table-dataflow"])
}

fn default_column_labels() -> Vec<String> {
    strings(&["dataflow"])
}

fn default_term_edge_labels() -> Vec<String> {
    strings(&[
        "related-term",
        "synonym",
        "antonym",
        "preferred-term",
        "replacement-term",
        "translation",
        "is-a",
    ])
}

fn default_assignment_edge_label() -> String {
    "semantic-assignment".to_string()
}

fn default_guid_key() -> String {
    "veguid".to_string()
}

fn default_display_name_keys() -> Vec<String> {
    strings(&["vedisplayName", "displayname"])
}

fn default_allowed_keys() -> Vec<String> {
    strings(&[
        "vepropqualifiedName",
        "vepropname",
        "vepropdescription",
        "vepropowner",
        "veproptableType",
        "vepropdataType",
        "vetypeName",
        "vecreateTime",
        "veupdateTime",
    ])
}

fn default_strip_prefixes() -> Vec<String> {
    strings(&["veprop", "ve"])
}

fn default_max_depth() -> u32 {
    1000
}

fn default_max_vertices() -> usize {
    100_000
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
