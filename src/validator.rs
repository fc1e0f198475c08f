//! Validator - splits candidates into ready and deferred
//!
//! Deferred declarations are handed back to the host unchanged for a later
//! round. Deferral is not a failure and is only logged at debug.

use crate::graph::SymbolGraph;
use crate::symbol::ClassDeclaration;
use crate::uri::DeclarationId;

/// Result of partitioning a candidate set; both sides keep input order.
#[derive(Debug, Default)]
pub struct Partition<'g> {
    pub ready: Vec<&'g ClassDeclaration>,
    pub deferred: Vec<&'g ClassDeclaration>,
}

impl<'g> Partition<'g> {
    /// Ids of the deferred declarations
    pub fn deferred_ids(&self) -> Vec<DeclarationId> {
        self.deferred.iter().map(|d| d.id.clone()).collect()
    }

    pub fn is_deferred(&self, id: &DeclarationId) -> bool {
        self.deferred.iter().any(|d| &d.id == id)
    }
}

/// Partition `candidates` by the graph's resolution check.
pub fn partition<'g, G>(graph: &G, candidates: impl IntoIterator<Item = &'g ClassDeclaration>) -> Partition<'g>
where
    G: SymbolGraph + ?Sized,
{
    let mut result = Partition::default();
    for candidate in candidates {
        if graph.is_resolved(candidate) {
            result.ready.push(candidate);
        } else {
            tracing::debug!("Deferring {} to a later round", candidate.id);
            result.deferred.push(candidate);
        }
    }
    result
}
