//! Raw graph elements → lineage-facing vertices and edges.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::schema::PropertiesConfig;
use crate::graph::adapter::{RawEdge, RawVertex};
use crate::types::{LineageEdge, LineageVertex};

// ---------------------------------------------------------------------------
// PropertyAllowList
// ---------------------------------------------------------------------------

/// Which raw property keys reach the response, and under what name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAllowList {
    allowed: BTreeSet<String>,
    /// Sorted longest first so `veprop` wins over `ve`.
    prefixes: Vec<String>,
}

impl PropertyAllowList {
    pub fn new<K, P>(allowed: K, prefixes: P) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            prefixes,
        }
    }

    pub fn allows(&self, key: &str) -> bool {
        self.allowed.contains(key)
    }

    /// `key` with the longest matching internal prefix removed. A key that
    /// is nothing but a prefix is returned unchanged.
    pub fn public_key<'k>(&self, key: &'k str) -> &'k str {
        self.prefixes
            .iter()
            .find_map(|p| key.strip_prefix(p.as_str()).filter(|rest| !rest.is_empty()))
            .unwrap_or(key)
    }

    /// Copy allowed properties, renaming keys to their public form.
    pub fn project(&self, raw: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        raw.iter()
            .filter(|(k, _)| self.allows(k))
            .map(|(k, v)| (self.public_key(k).to_string(), v.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// VertexMapper
// ---------------------------------------------------------------------------

/// Maps raw elements to the lineage representation.
#[derive(Debug, Clone)]
pub struct VertexMapper {
    allow_list: PropertyAllowList,
    display_name_keys: Vec<String>,
    guid_key: String,
}

impl VertexMapper {
    pub fn from_config(config: &PropertiesConfig) -> Self {
        Self {
            allow_list: PropertyAllowList::new(
                config.allowed_keys.iter().cloned(),
                config.strip_prefixes.iter().cloned(),
            ),
            display_name_keys: config.display_name_keys.clone(),
            guid_key: config.guid_key.clone(),
        }
    }

    pub fn to_lineage_vertex(&self, raw: &RawVertex) -> LineageVertex {
        let display_name = self
            .display_name_keys
            .iter()
            .find_map(|k| raw.properties.get(k))
            .cloned();
        LineageVertex {
            node_id: raw.id.clone(),
            kind: raw.label.clone(),
            display_name,
            entity_guid: raw.properties.get(&self.guid_key).cloned(),
            properties: self.allow_list.project(&raw.properties),
        }
    }

    pub fn to_lineage_edge(&self, raw: &RawEdge) -> LineageEdge {
        LineageEdge::new(raw.label.clone(), raw.source.clone(), raw.target.clone())
    }
}

impl Default for VertexMapper {
    fn default() -> Self {
        Self::from_config(&PropertiesConfig::default())
    }
}
