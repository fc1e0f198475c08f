//! Symbol graph snapshots - serialized rounds for batch hosts
//!
//! A snapshot is a JSON or TOML document listing declarations and the ids the
//! host could not resolve yet:
//!
//! ```json
//! {
//!   "declarations": [{ "id": "decl://com.example/Calculator.kt#Calculator", "kind": "interface" }],
//!   "unresolved": []
//! }
//! ```

use crate::{Error, Result};
use crate::graph::InMemoryGraph;
use crate::symbol::ClassDeclaration;
use crate::uri::DeclarationId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub declarations: Vec<ClassDeclaration>,
    #[serde(default)]
    pub unresolved: Vec<DeclarationId>,
}

impl Snapshot {
    /// Parse a snapshot; `.toml` files are read as TOML, everything else as JSON
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(contents)
                .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e))),
            _ => serde_json::from_str(contents)
                .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e))),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(path, &contents)
    }

    pub fn into_graph(self) -> InMemoryGraph {
        let mut graph = InMemoryGraph::new();
        for declaration in self.declarations {
            graph.add_declaration(declaration);
        }
        for id in self.unresolved {
            graph.mark_unresolved(id);
        }
        graph
    }
}

impl From<&InMemoryGraph> for Snapshot {
    fn from(graph: &InMemoryGraph) -> Self {
        let mut unresolved: Vec<_> = graph.unresolved_ids().cloned().collect();
        unresolved.sort();
        Self {
            declarations: graph.declarations().to_vec(),
            unresolved,
        }
    }
}

/// Expand glob patterns into a sorted, de-duplicated list of files
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let entries = glob::glob(pattern)
            .map_err(|e| Error::Snapshot(format!("bad pattern '{}': {}", pattern, e)))?;
        let before = paths.len();
        for entry in entries {
            let path = entry.map_err(|e| Error::Snapshot(e.to_string()))?;
            if path.is_file() {
                paths.push(path);
            }
        }
        if paths.len() == before {
            tracing::warn!("Pattern '{}' matched no snapshot files", pattern);
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Load and merge every snapshot matched by `patterns`
pub fn load_graph(patterns: &[String]) -> Result<InMemoryGraph> {
    let mut graph = InMemoryGraph::new();
    for path in expand_patterns(patterns)? {
        tracing::debug!("Loading snapshot {}", path.display());
        graph.merge(Snapshot::load(&path)?.into_graph());
    }
    Ok(graph)
}
