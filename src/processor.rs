//! Processor - runs one generation round over a symbol graph
//!
//! A round:
//! 1. Collects declarations carrying either marker (union, de-duplicated)
//! 2. Partitions them into ready and deferred
//! 3. Synthesizes every ready interface and checks target names for collisions
//! 4. Writes all artifacts, each tagged with its source file
//!
//! Every fatal error surfaces before step 4, so a failed round writes nothing.

use crate::{Error, Result};
use crate::graph::SymbolGraph;
use crate::symbol::ClassDeclaration;
use crate::synth::{CodeSynthesizer, SynthesizedClass};
use crate::uri::DeclarationId;
use crate::validator;
use crate::writer::{ArtifactWriter, CodeGenerator, DependencyDescriptor, WriteResult};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// What one round produced.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RoundOutcome {
    /// Declarations to resubmit in a later round
    pub deferred: Vec<DeclarationId>,
    /// Artifacts written this round, in candidate order
    pub artifacts: Vec<WriteResult>,
    /// Marked declarations that are not interfaces
    pub skipped: Vec<DeclarationId>,
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round Summary:")?;
        writeln!(f, "  Artifacts: {}", self.artifacts.len())?;
        writeln!(f, "  Deferred: {}", self.deferred.len())?;
        writeln!(f, "  Skipped: {}", self.skipped.len())
    }
}

/// Classes synthesized for a round before anything is written.
#[derive(Debug, Default, Clone)]
pub struct RoundPlan {
    pub classes: Vec<SynthesizedClass>,
    pub skipped: Vec<DeclarationId>,
    pub deferred: Vec<DeclarationId>,
}

/// Orchestrates synthesis, validation and writing for one round.
pub struct Processor {
    synthesizer: CodeSynthesizer,
    extension: String,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(CodeSynthesizer::default())
    }
}

impl Processor {
    pub fn new(synthesizer: CodeSynthesizer) -> Self {
        Self {
            synthesizer,
            extension: crate::synth::FILE_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Declarations carrying either marker, de-duplicated by id in first-seen order.
    pub fn candidates<'g, G>(&self, graph: &'g G) -> Vec<&'g ClassDeclaration>
    where
        G: SymbolGraph + ?Sized,
    {
        let markers = self.synthesizer.markers();
        let mut seen = HashSet::new();
        graph
            .declarations_annotated_with(&markers.class)
            .into_iter()
            .chain(graph.declarations_annotated_with(&markers.function))
            .filter(|d| seen.insert(d.id.clone()))
            .collect()
    }

    /// Synthesize every ready interface without writing anything.
    pub fn plan<G>(&self, graph: &G) -> Result<RoundPlan>
    where
        G: SymbolGraph + ?Sized,
    {
        let candidates = self.candidates(graph);
        let partition = validator::partition(graph, candidates);

        let mut classes = Vec::new();
        let mut skipped = Vec::new();
        for declaration in &partition.ready {
            match self.synthesizer.synthesize(declaration)? {
                Some(class) => classes.push(class),
                None => skipped.push(declaration.id.clone()),
            }
        }

        check_collisions(&classes)?;
        Ok(RoundPlan {
            classes,
            skipped,
            deferred: partition.deferred_ids(),
        })
    }

    /// Run one round and write its artifacts through `codegen`.
    pub fn process<G>(&self, graph: &G, codegen: &mut dyn CodeGenerator) -> Result<RoundOutcome>
    where
        G: SymbolGraph + ?Sized,
    {
        let RoundPlan { classes, skipped, deferred } = self.plan(graph)?;

        let mut writer = ArtifactWriter::new(codegen).with_extension(self.extension.clone());
        let mut artifacts = Vec::with_capacity(classes.len());
        for class in &classes {
            let dependencies = DependencyDescriptor::isolating(&class.source);
            artifacts.push(writer.write(class, &dependencies)?);
        }

        tracing::info!(
            "Round complete: {} artifact(s), {} deferred, {} skipped",
            artifacts.len(),
            deferred.len(),
            skipped.len()
        );

        Ok(RoundOutcome {
            deferred,
            artifacts,
            skipped,
        })
    }

    /// Run one round and return only the deferred declarations.
    pub fn process_round<G>(&self, graph: &G, codegen: &mut dyn CodeGenerator) -> Result<Vec<DeclarationId>>
    where
        G: SymbolGraph + ?Sized,
    {
        Ok(self.process(graph, codegen)?.deferred)
    }
}

fn check_collisions(classes: &[SynthesizedClass]) -> Result<()> {
    let mut targets: HashMap<(&str, &str), &DeclarationId> = HashMap::new();
    for class in classes {
        if let Some(first) = targets.insert((class.package.as_str(), class.name.as_str()), &class.source) {
            return Err(Error::NameCollision {
                package: class.package.clone(),
                name: class.name.clone(),
                first: first.clone(),
                second: class.source.clone(),
            });
        }
    }
    Ok(())
}
