//! Command-line surface: run lineage queries and move graph dumps in and
//! out of a SQLite store.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::load_config;
use crate::error::{LineageError, Result};
use crate::export;
use crate::graph::cancel::QueryContext;
use crate::graph::store::SqliteGraphStore;
use crate::lineage::LineageEngine;
use crate::types::{LineageQuery, Scope, View};

/// Data lineage queries over a property graph
#[derive(Debug, Parser)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve one lineage scope and print it as JSON
    Query {
        /// SQLite graph database
        #[arg(long)]
        db: PathBuf,

        /// ultimate-source, ultimate-destination, end-to-end,
        /// source-and-destination or glossary
        #[arg(long)]
        scope: String,

        /// host, table or column
        #[arg(long, default_value = "column")]
        view: String,

        /// Starting vertex ID
        #[arg(long)]
        node: String,

        /// Keep only vertices whose display name contains this substring
        #[arg(long, default_value = "")]
        contains: String,

        /// Keep process and sub-process vertices
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        include_processes: bool,

        /// Per-query deadline; overrides the configured timeout
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write every vertex and edge to a JSON dump
    Export {
        #[arg(long)]
        db: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },

    /// Load a JSON dump into the database
    Import {
        #[arg(long)]
        db: PathBuf,

        #[arg(long)]
        file: PathBuf,
    },
}

fn open_store(db: &std::path::Path) -> Result<SqliteGraphStore> {
    let path = db
        .to_str()
        .ok_or_else(|| LineageError::Other(format!("database path is not valid UTF-8: {}", db.display())))?;
    SqliteGraphStore::new(path)
}

/// Open a database that must already exist; only `import` may create one.
fn open_existing_store(db: &std::path::Path) -> Result<SqliteGraphStore> {
    if !db.is_file() {
        return Err(LineageError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("graph database not found: {}", db.display()),
        )));
    }
    open_store(db)
}

/// Execute a parsed command, returning what should be printed to stdout.
pub fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Commands::Query {
            db,
            scope,
            view,
            node,
            contains,
            include_processes,
            timeout_ms,
            config,
        } => {
            let scope = Scope::from_str_loose(&scope).ok_or(LineageError::UnknownScope(scope))?;
            let view = View::from_str_loose(&view).ok_or(LineageError::UnknownView(view))?;
            let config = load_config(config.as_deref())?;

            let ctx = match timeout_ms.or(config.traversal.timeout_ms) {
                Some(ms) => QueryContext::with_timeout(Duration::from_millis(ms)),
                None => QueryContext::unbounded(),
            };

            let store = open_existing_store(&db)?;
            let engine = LineageEngine::new(&store, config);
            let query = LineageQuery::new(scope, view, node)
                .display_name_must_contain(contains)
                .include_processes(include_processes);

            let result = engine.query(&query, &ctx)?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
        Commands::Export { db, out } => {
            let store = open_existing_store(&db)?;
            let dump = export::dump(&store)?;
            export::write_dump(&dump, &out)?;
            Ok(format!(
                "exported {} vertices and {} edges to {}",
                dump.vertices.len(),
                dump.edges.len(),
                out.display()
            ))
        }
        Commands::Import { db, file } => {
            let dump = export::read_dump(&file)?;
            let store = open_store(&db)?;
            export::restore(&store, &dump)?;
            let stats = store.get_stats()?;
            Ok(format!(
                "imported {} vertices and {} edges; store now holds {} vertices and {} edges",
                dump.vertices.len(),
                dump.edges.len(),
                stats.vertices,
                stats.edges
            ))
        }
    }
}
