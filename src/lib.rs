//! # Implgen - Interface Implementation Synthesizer
//!
//! Annotation-driven code generation over a resolved symbol graph.
//!
//! Implgen provides:
//! - A read-only symbol graph adapter the host implements (or fills in memory)
//! - Typed generation directives resolved from annotation instances
//! - A synthesizer that derives a concrete class for every marked interface
//! - A validator that defers unresolved declarations to a later round
//! - An artifact writer that emits source files plus dependency metadata

pub mod uri;
pub mod symbol;
pub mod graph;
pub mod annotation;
pub mod naming;
pub mod synth;
pub mod validator;
pub mod writer;
pub mod processor;
pub mod snapshot;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use uri::DeclarationId;
pub use symbol::{AnnotationInstance, AnnotationValue, ClassDeclaration, DeclarationKind, FunctionDeclaration, ParameterDeclaration, TypeRef};
pub use graph::{InMemoryGraph, SymbolGraph};
pub use annotation::{Directive, InterfaceDirectives, Markers};
pub use naming::{DeclarationNamePolicy, FileBaseNamePolicy, NamingPolicy};
pub use synth::{CodeSynthesizer, SynthesizedClass};
pub use validator::Partition;
pub use writer::{ArtifactWriter, CodeGenerator, DependencyDescriptor, FsCodeGenerator, MemoryCodeGenerator, WriteResult, WriteStatus};
pub use processor::{Processor, RoundOutcome, RoundPlan};

/// Result type alias for Implgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Implgen operations.
///
/// Every variant except `Io`/`Json`/`Snapshot` is fatal for the current
/// round and carries enough context to locate the offending source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid declaration id: {0}")]
    InvalidId(String),

    #[error("Annotation @{annotation} on {declaration} has no argument at index {index}")]
    MissingArgument {
        declaration: DeclarationId,
        annotation: String,
        index: usize,
    },

    #[error("Annotation @{annotation} on {declaration}: expected {expected}, got {actual}")]
    InvalidArgument {
        declaration: DeclarationId,
        annotation: String,
        expected: &'static str,
        actual: String,
    },

    #[error("Interface {declaration} is missing the @{annotation} marker")]
    MissingMarker {
        declaration: DeclarationId,
        annotation: String,
    },

    #[error("Target {package}.{name} is derived from both {first} and {second}")]
    NameCollision {
        package: String,
        name: String,
        first: DeclarationId,
        second: DeclarationId,
    },

    #[error("Function {function} on {declaration} must declare exactly 2 parameters, found {found}")]
    ArityMismatch {
        declaration: DeclarationId,
        function: String,
        found: usize,
    },

    #[error("Function {function} on {declaration} uses non-numeric type {type_name}")]
    NonNumericOperand {
        declaration: DeclarationId,
        function: String,
        type_name: String,
    },

    #[error("Invalid target name '{name}' derived for {declaration}")]
    InvalidTargetName {
        declaration: DeclarationId,
        name: String,
    },

    #[error("Invalid {role} '{name}' in {declaration}")]
    InvalidIdentifier {
        declaration: DeclarationId,
        role: &'static str,
        name: String,
    },

    #[error("Evaluation error: {0}")]
    Eval(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
