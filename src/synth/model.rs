//! In-memory model of a generated class

use crate::symbol::{ParameterDeclaration, TypeRef};
use crate::uri::DeclarationId;

/// Name of the fixed report method on every generated class
pub const REPORT_METHOD: &str = "report";

/// Body of a generated method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodBody {
    /// Emit `message` through the sink and return nothing
    Emit { message: String },
    /// Emit `message` through the sink once, then return `lhs + rhs`
    EmitThenSum { message: String, lhs: String, rhs: String },
}

impl MethodBody {
    pub fn message(&self) -> &str {
        match self {
            MethodBody::Emit { message } | MethodBody::EmitThenSum { message, .. } => message,
        }
    }
}

/// A method on a synthesized class.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMethod {
    pub name: String,
    pub parameters: Vec<ParameterDeclaration>,
    /// `None` means unit
    pub return_type: Option<TypeRef>,
    /// Overrides an interface function
    pub is_override: bool,
    pub body: MethodBody,
}

impl GeneratedMethod {
    /// The fixed `report()` method
    pub fn report(message: impl Into<String>) -> Self {
        Self {
            name: REPORT_METHOD.to_string(),
            parameters: Vec::new(),
            return_type: None,
            is_override: false,
            body: MethodBody::Emit { message: message.into() },
        }
    }

    pub fn is_report(&self) -> bool {
        !self.is_override && self.name == REPORT_METHOD
    }
}

/// A class generated for one interface; created and discarded within a round.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedClass {
    /// Declaration this class was derived from
    pub source: DeclarationId,
    /// Target package (same as the interface)
    pub package: String,
    /// Target simple name
    pub name: String,
    /// Qualified name of the implemented interface
    pub implements: String,
    /// Report method first, then overrides in interface order
    pub methods: Vec<GeneratedMethod>,
    /// Interface functions without a marker or default remain abstract
    pub is_abstract: bool,
}

impl SynthesizedClass {
    /// Fully qualified name of the generated class
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Generated overrides (everything but the report method)
    pub fn overrides(&self) -> impl Iterator<Item = &GeneratedMethod> {
        self.methods.iter().filter(|m| m.is_override)
    }

    pub fn method(&self, name: &str) -> Option<&GeneratedMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}
