//! Symbol Graph - read-only view over the host's declarations
//!
//! `SymbolGraph` is the seam between the engine and whatever produced the
//! declarations (a compiler integration, a snapshot file, a test). The engine
//! only queries it and never mutates it.

use std::collections::{HashMap, HashSet};
use crate::symbol::{ClassDeclaration, DeclarationKind};
use crate::uri::DeclarationId;

/// Host boundary consumed by the processor.
pub trait SymbolGraph {
    /// Declarations carrying `annotation` on themselves or on any member function.
    ///
    /// Implementations should return a stable order; the processor preserves it.
    fn declarations_annotated_with(&self, annotation: &str) -> Vec<&ClassDeclaration>;

    /// Whether the declaration is fully resolved and safe to generate from now.
    fn is_resolved(&self, declaration: &ClassDeclaration) -> bool;
}

/// In-memory symbol graph, ordered by insertion.
///
/// Used by the batch binary (filled from snapshots) and by tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryGraph {
    /// Declarations in insertion order
    declarations: Vec<ClassDeclaration>,
    /// Position of each declaration in `declarations`
    index: HashMap<DeclarationId, usize>,
    /// Declarations the host explicitly reported as not yet resolved
    unresolved: HashSet<DeclarationId>,
}

impl InMemoryGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, replacing any earlier one with the same id in place
    pub fn add_declaration(&mut self, declaration: ClassDeclaration) {
        match self.index.get(&declaration.id) {
            Some(&pos) => self.declarations[pos] = declaration,
            None => {
                self.index.insert(declaration.id.clone(), self.declarations.len());
                self.declarations.push(declaration);
            }
        }
    }

    /// Builder-style variant of `add_declaration`
    pub fn with_declaration(mut self, declaration: ClassDeclaration) -> Self {
        self.add_declaration(declaration);
        self
    }

    /// Report a declaration as not yet resolved for this round
    pub fn mark_unresolved(&mut self, id: DeclarationId) {
        self.unresolved.insert(id);
    }

    /// Get a declaration by id
    pub fn get(&self, id: &DeclarationId) -> Option<&ClassDeclaration> {
        self.index.get(id).map(|&pos| &self.declarations[pos])
    }

    /// All declarations in insertion order
    pub fn declarations(&self) -> &[ClassDeclaration] {
        &self.declarations
    }

    /// Ids explicitly marked unresolved
    pub fn unresolved_ids(&self) -> impl Iterator<Item = &DeclarationId> {
        self.unresolved.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Merge another graph into this one; later declarations win on id clashes
    pub fn merge(&mut self, other: InMemoryGraph) {
        for declaration in other.declarations {
            self.add_declaration(declaration);
        }
        self.unresolved.extend(other.unresolved);
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let interfaces = self.declarations
            .iter()
            .filter(|d| d.kind == DeclarationKind::Interface)
            .count();
        let functions = self.declarations.iter().map(|d| d.functions.len()).sum();
        let annotations = self.declarations
            .iter()
            .map(|d| d.annotations.len() + d.functions.iter().map(|f| f.annotations.len()).sum::<usize>())
            .sum();
        let unresolved = self.declarations
            .iter()
            .filter(|d| !self.is_resolved(d))
            .count();

        GraphStats {
            declarations: self.declarations.len(),
            interfaces,
            functions,
            annotations,
            unresolved,
        }
    }
}

impl SymbolGraph for InMemoryGraph {
    fn declarations_annotated_with(&self, annotation: &str) -> Vec<&ClassDeclaration> {
        self.declarations
            .iter()
            .filter(|d| d.carries_annotation(annotation))
            .collect()
    }

    fn is_resolved(&self, declaration: &ClassDeclaration) -> bool {
        if self.unresolved.contains(&declaration.id) {
            return false;
        }
        declaration
            .functions
            .iter()
            .flat_map(|f| f.type_refs())
            .all(|t| t.resolved)
    }
}

/// Statistics about a symbol graph
#[derive(Debug, Clone, serde::Serialize)]
pub struct GraphStats {
    pub declarations: usize,
    pub interfaces: usize,
    pub functions: usize,
    pub annotations: usize,
    pub unresolved: usize,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Symbol Graph Statistics:")?;
        writeln!(f, "  Declarations: {} (interfaces: {})", self.declarations, self.interfaces)?;
        writeln!(f, "  Functions: {}", self.functions)?;
        writeln!(f, "  Annotations: {}", self.annotations)?;
        writeln!(f, "  Unresolved: {}", self.unresolved)
    }
}
