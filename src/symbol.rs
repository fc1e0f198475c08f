//! Declaration model - the host's view of parsed declarations
//!
//! Every round receives an immutable snapshot made of:
//! - `ClassDeclaration`: interface, class or other type-like declaration
//! - `FunctionDeclaration`: member functions in declaration order
//! - `ParameterDeclaration` / `TypeRef`: signatures as the host resolved them
//! - `AnnotationInstance`: named tags with ordered argument values

use crate::{Error, Result};
use crate::uri::DeclarationId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a class-like declaration. Only interfaces are eligible for synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Interface,
    Class,
    /// Objects, enums, annotation classes - anything the engine never implements
    Other,
}

impl DeclarationKind {
    /// Get the string representation of the declaration kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Interface => "interface",
            DeclarationKind::Class => "class",
            DeclarationKind::Other => "other",
        }
    }

    /// Get all declaration kinds
    pub fn all() -> &'static [DeclarationKind] {
        &[
            DeclarationKind::Interface,
            DeclarationKind::Class,
            DeclarationKind::Other,
        ]
    }
}

impl FromStr for DeclarationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "interface" | "trait" | "protocol" => Ok(DeclarationKind::Interface),
            "class" | "struct" => Ok(DeclarationKind::Class),
            "other" | "object" | "enum" | "annotation" => Ok(DeclarationKind::Other),
            _ => Err(Error::Snapshot(format!("Unknown declaration kind: {}", s))),
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single annotation argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AnnotationValue {
    /// Name of the value's type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            AnnotationValue::Bool(_) => "Boolean",
            AnnotationValue::Int(_) => "Int",
            AnnotationValue::Float(_) => "Double",
            AnnotationValue::String(_) => "String",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::String(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::String(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Int(value)
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}

/// A named tag attached to a declaration or function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationInstance {
    /// Annotation name, simple (`SUM`) or qualified (`com.example.SUM`)
    pub name: String,
    /// Arguments in declaration order
    #[serde(default)]
    pub arguments: Vec<AnnotationValue>,
}

impl AnnotationInstance {
    /// Create an annotation with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Shorthand for an annotation carrying a single message argument
    pub fn message(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name).with_argument(AnnotationValue::String(message.into()))
    }

    /// Append an argument
    pub fn with_argument(mut self, value: impl Into<AnnotationValue>) -> Self {
        self.arguments.push(value.into());
        self
    }

    /// Simple name of the annotation (last dotted segment)
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Check whether this instance matches an annotation name.
    ///
    /// A qualified query must match exactly; a simple query matches on the
    /// short name, the way hosts compare `shortName` against a marker class.
    pub fn matches(&self, name: &str) -> bool {
        if name.contains('.') {
            self.name == name
        } else {
            self.short_name() == name
        }
    }
}

/// A type reference as resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Type name as written or resolved (`Int`, `kotlin.Long`, `List<String>`)
    pub name: String,
    #[serde(default)]
    pub nullable: bool,
    /// Cleared by the host when the type could not be resolved in this round
    #[serde(default = "default_resolved")]
    pub resolved: bool,
}

fn default_resolved() -> bool {
    true
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            resolved: true,
        }
    }

    /// A reference the host could not resolve yet (forward reference, error type)
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            resolved: false,
            ..Self::new(name)
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Simple name without package qualification
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A member function of a class-like declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
    /// Declared return type (`None` means unit)
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
    /// Whether the interface supplies a body for this function
    #[serde(default)]
    pub has_default: bool,
}

impl FunctionDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            annotations: Vec::new(),
            has_default: false,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.parameters.push(ParameterDeclaration::new(name, ty));
        self
    }

    pub fn returning(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Check if any annotation on this function matches `name`
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.matches(name))
    }

    /// All type references in the signature
    pub fn type_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.parameters.iter().map(|p| &p.ty).chain(self.return_type.iter())
    }
}

/// A class-like declaration in the symbol graph.
///
/// Equality and hashing use the declaration id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub id: DeclarationId,
    pub kind: DeclarationKind,
    #[serde(default)]
    pub functions: Vec<FunctionDeclaration>,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
}

impl ClassDeclaration {
    pub fn new(id: DeclarationId, kind: DeclarationKind) -> Self {
        Self {
            id,
            kind,
            functions: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Shorthand for an interface declaration
    pub fn interface(package: &str, file: &str, name: &str) -> Self {
        Self::new(DeclarationId::new(package, file, name), DeclarationKind::Interface)
    }

    pub fn with_function(mut self, function: FunctionDeclaration) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == DeclarationKind::Interface
    }

    /// Check if the declaration itself carries an annotation matching `name`
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.matches(name))
    }

    /// Check if the declaration or any of its functions carries `name`
    pub fn carries_annotation(&self, name: &str) -> bool {
        self.has_annotation(name) || self.functions.iter().any(|f| f.has_annotation(name))
    }

    /// Short description for display
    pub fn short_description(&self) -> String {
        format!("{} {} ({} functions)", self.kind, self.id.qualified_name(), self.functions.len())
    }
}

impl PartialEq for ClassDeclaration {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassDeclaration {}

impl std::hash::Hash for ClassDeclaration {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in DeclarationKind::all() {
            let parsed: DeclarationKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!(DeclarationKind::from_str("trait").unwrap(), DeclarationKind::Interface);
        assert_eq!(DeclarationKind::from_str("object").unwrap(), DeclarationKind::Other);
        assert!(DeclarationKind::from_str("module").is_err());
    }

    #[test]
    fn test_annotation_matching() {
        let qualified = AnnotationInstance::message("com.example.SUM", "Adding");
        assert!(qualified.matches("SUM"));
        assert!(qualified.matches("com.example.SUM"));
        assert!(!qualified.matches("org.other.SUM"));

        let simple = AnnotationInstance::new("SUM");
        assert!(simple.matches("SUM"));
        assert!(!simple.matches("SUMMARY"));
    }

    #[test]
    fn test_carries_annotation_on_members() {
        let decl = ClassDeclaration::interface("p", "Calc.kt", "Calc")
            .with_function(
                FunctionDeclaration::new("sum")
                    .with_annotation(AnnotationInstance::message("SUM", "Adding")),
            );

        assert!(!decl.has_annotation("SUM"));
        assert!(decl.carries_annotation("SUM"));
    }

    #[test]
    fn test_declaration_deserialize() {
        let json = r#"{
            "id": "decl://com.example/Calculator.kt#Calculator",
            "kind": "interface",
            "annotations": [{ "name": "AutoGeneratedCalculator", "arguments": ["Generated"] }],
            "functions": [{
                "name": "sum",
                "parameters": [
                    { "name": "x", "type": { "name": "Int" } },
                    { "name": "y", "type": { "name": "Int" } }
                ],
                "return_type": { "name": "Int" },
                "annotations": [{ "name": "SUM", "arguments": ["Adding", 2] }]
            }]
        }"#;

        let decl: ClassDeclaration = serde_json::from_str(json).unwrap();
        assert!(decl.is_interface());
        assert_eq!(decl.functions[0].parameters.len(), 2);
        assert!(decl.functions[0].parameters[0].ty.resolved);
        assert_eq!(
            decl.functions[0].annotations[0].arguments,
            vec![AnnotationValue::String("Adding".into()), AnnotationValue::Int(2)]
        );
    }
}
