//! Config file discovery and loading.
//!
//! Priority: explicit path > `LINEAGE_GRAPH_CONFIG` > platform config dir >
//! built-in defaults. A missing file at a discovered location falls back to
//! defaults; a file that exists but does not parse is an error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::schema::LineageConfig;
use crate::error::{LineageError, Result};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "LINEAGE_GRAPH_CONFIG";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// `<platform config dir>/lineage-graph/config.yaml`, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lineage-graph").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Parse and validate a config file.
pub fn load_from_file(path: &Path) -> Result<LineageConfig> {
    let text = std::fs::read_to_string(path)?;
    let config: LineageConfig = serde_yaml::from_str(&text)?;
    validate(&config)?;
    Ok(config)
}

/// Resolve and load the effective configuration.
///
/// An explicit path must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<LineageConfig> {
    if let Some(path) = explicit {
        return load_from_file(path);
    }

    let discovered = std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path);

    match discovered {
        Some(path) if path.is_file() => {
            tracing::info!(path = %path.display(), "loading lineage config");
            load_from_file(&path)
        }
        _ => Ok(LineageConfig::default()),
    }
}

/// Reject configs that would make every traversal fail.
pub fn validate(config: &LineageConfig) -> Result<()> {
    if config.traversal.max_depth == 0 {
        return Err(LineageError::Config(
            "traversal.max_depth must be at least 1".into(),
        ));
    }
    if config.traversal.max_vertices == 0 {
        return Err(LineageError::Config(
            "traversal.max_vertices must be at least 1".into(),
        ));
    }
    if config.properties.display_name_keys.is_empty() {
        return Err(LineageError::Config(
            "properties.display_name_keys must name at least one key".into(),
        ));
    }
    for (view, labels) in [
        ("host", &config.views.host),
        ("table", &config.views.table),
        ("column", &config.views.column),
    ] {
        if labels.is_empty() {
            tracing::warn!(view, "view has no edge labels; its queries will not traverse");
        }
    }
    Ok(())
}
