//! Code Synthesizer
//!
//! Turns one marked interface into a `SynthesizedClass`:
//! - a fixed `report()` method emitting the class marker's message
//! - one override per function carrying the function marker, emitting its
//!   message and returning the sum of the two parameters
//!
//! Rendering to source text lives in `render`, and `eval` runs the model
//! directly against a message sink.

pub mod eval;
pub mod model;
pub mod render;

pub use eval::{Arithmetic, MessageSink, RecordingSink, StdoutSink, Value};
pub use model::{GeneratedMethod, MethodBody, SynthesizedClass, REPORT_METHOD};
pub use render::{render_class, FILE_EXTENSION};

use crate::{Error, Result};
use crate::annotation::{InterfaceDirectives, Markers};
use crate::naming::{self, DeclarationNamePolicy, NamingPolicy};
use crate::symbol::{ClassDeclaration, FunctionDeclaration, TypeRef};

/// Types the generated `a + b` body is known to compile for.
const NUMERIC_TYPES: &[&str] = &["Byte", "Short", "Int", "Long", "Float", "Double"];

/// Check whether a type reference names an addable numeric type.
pub fn is_numeric(ty: &TypeRef) -> bool {
    if ty.nullable {
        return false;
    }
    let name = ty.name.strip_prefix("kotlin.").unwrap_or(&ty.name);
    NUMERIC_TYPES.contains(&name)
}

/// Options that relax or tighten synthesis.
#[derive(Debug, Clone, Default)]
pub struct SynthesizerOptions {
    /// Generate sum bodies even for non-numeric operand types
    pub allow_non_numeric: bool,
    /// Log skipped non-interface declarations at warn instead of debug
    pub warn_on_non_interface: bool,
}

/// Builds synthesized classes from interface declarations.
pub struct CodeSynthesizer {
    markers: Markers,
    naming: Box<dyn NamingPolicy>,
    options: SynthesizerOptions,
}

impl Default for CodeSynthesizer {
    fn default() -> Self {
        Self::new(Markers::default(), Box::new(DeclarationNamePolicy::default()))
    }
}

impl CodeSynthesizer {
    pub fn new(markers: Markers, naming: Box<dyn NamingPolicy>) -> Self {
        Self {
            markers,
            naming,
            options: SynthesizerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SynthesizerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Synthesize a class for `declaration`.
    ///
    /// Returns `Ok(None)` for declarations that are not interfaces.
    pub fn synthesize(&self, declaration: &ClassDeclaration) -> Result<Option<SynthesizedClass>> {
        if !declaration.is_interface() {
            if self.options.warn_on_non_interface {
                tracing::warn!("Skipping {}: @{} requires an interface, found {}", declaration.id, self.markers.class, declaration.kind);
            } else {
                tracing::debug!("Skipping non-interface {} ({})", declaration.id, declaration.kind);
            }
            return Ok(None);
        }

        if !naming::is_package_name(&declaration.id.package) {
            return Err(invalid_identifier(declaration, "package", &declaration.id.package));
        }

        let directives = InterfaceDirectives::resolve(declaration, &self.markers)?;
        let report = directives.report().ok_or_else(|| Error::MissingMarker {
            declaration: declaration.id.clone(),
            annotation: self.markers.class.clone(),
        })?;
        let name = self.naming.resolve(&declaration.id)?;

        let mut methods = vec![GeneratedMethod::report(report)];
        let mut is_abstract = false;

        for (position, function) in declaration.functions.iter().enumerate() {
            match directives.sum_at(position) {
                Some(message) => methods.push(self.sum_method(declaration, function, message)?),
                None if !function.has_default => {
                    tracing::debug!("{}.{} has no @{}; leaving it abstract", declaration.id.name, function.name, self.markers.function);
                    is_abstract = true;
                }
                None => {}
            }
        }

        tracing::debug!("Synthesized {} with {} method(s) for {}", name, methods.len(), declaration.id);

        Ok(Some(SynthesizedClass {
            source: declaration.id.clone(),
            package: declaration.id.package.clone(),
            name,
            implements: declaration.id.qualified_name(),
            methods,
            is_abstract,
        }))
    }

    fn sum_method(&self, declaration: &ClassDeclaration, function: &FunctionDeclaration, message: &str) -> Result<GeneratedMethod> {
        let [first, second] = function.parameters.as_slice() else {
            return Err(Error::ArityMismatch {
                declaration: declaration.id.clone(),
                function: function.name.clone(),
                found: function.parameters.len(),
            });
        };

        if !naming::is_identifier(&function.name) {
            return Err(invalid_identifier(declaration, "function name", &function.name));
        }
        if let Some(param) = function.parameters.iter().find(|p| !naming::is_identifier(&p.name)) {
            return Err(invalid_identifier(declaration, "parameter name", &param.name));
        }
        if let Some(ty) = function.type_refs().find(|t| !naming::is_type_name(&t.name)) {
            return Err(invalid_identifier(declaration, "type name", &ty.name));
        }

        if !self.options.allow_non_numeric {
            let unit = TypeRef::new("Unit");
            let return_type = function.return_type.as_ref().unwrap_or(&unit);
            for ty in [&first.ty, &second.ty, return_type] {
                if !is_numeric(ty) {
                    return Err(Error::NonNumericOperand {
                        declaration: declaration.id.clone(),
                        function: function.name.clone(),
                        type_name: ty.to_string(),
                    });
                }
            }
        }

        Ok(GeneratedMethod {
            name: function.name.clone(),
            parameters: function.parameters.clone(),
            return_type: function.return_type.clone(),
            is_override: true,
            body: MethodBody::EmitThenSum {
                message: message.to_string(),
                lhs: first.name.clone(),
                rhs: second.name.clone(),
            },
        })
    }
}

fn invalid_identifier(declaration: &ClassDeclaration, role: &'static str, name: &str) -> Error {
    Error::InvalidIdentifier {
        declaration: declaration.id.clone(),
        role,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::FileBaseNamePolicy;
    use crate::symbol::{AnnotationInstance, DeclarationKind};

    fn sum_fn(name: &str, ty: &str, message: &str) -> FunctionDeclaration {
        FunctionDeclaration::new(name)
            .with_parameter("x", TypeRef::new(ty))
            .with_parameter("y", TypeRef::new(ty))
            .returning(TypeRef::new(ty))
            .with_annotation(AnnotationInstance::message("SUM", message))
    }

    fn calculator() -> ClassDeclaration {
        ClassDeclaration::interface("com.example", "Calculator.kt", "Calculator")
            .with_annotation(AnnotationInstance::message("AutoGeneratedCalculator", "Generated"))
            .with_function(sum_fn("sum", "Int", "Adding"))
    }

    #[test]
    fn test_calculator_model() {
        let class = CodeSynthesizer::default().synthesize(&calculator()).unwrap().unwrap();

        assert_eq!(class.name, "CalculatorImpl");
        assert_eq!(class.package, "com.example");
        assert_eq!(class.implements, "com.example.Calculator");
        assert!(!class.is_abstract);
        assert_eq!(class.methods.len(), 2);
        assert!(class.methods[0].is_report());
        assert_eq!(class.methods[0].body.message(), "Generated");

        let sum = class.method("sum").unwrap();
        assert!(sum.is_override);
        assert_eq!(
            sum.body,
            MethodBody::EmitThenSum { message: "Adding".into(), lhs: "x".into(), rhs: "y".into() }
        );
    }

    #[test]
    fn test_one_override_per_marked_function() {
        let decl = calculator()
            .with_function(sum_fn("plus", "Long", "Plus"))
            .with_function(FunctionDeclaration::new("describe").with_default())
            .with_function(sum_fn("add", "Double", "Add"));

        let class = CodeSynthesizer::default().synthesize(&decl).unwrap().unwrap();
        let names: Vec<_> = class.overrides().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["sum", "plus", "add"]);
        assert!(!class.is_abstract);
    }

    #[test]
    fn test_unmarked_abstract_function_makes_class_abstract() {
        let decl = calculator().with_function(FunctionDeclaration::new("reset"));
        let class = CodeSynthesizer::default().synthesize(&decl).unwrap().unwrap();
        assert!(class.is_abstract);
        assert_eq!(class.overrides().count(), 1);
    }

    #[test]
    fn test_skips_non_interface() {
        let mut decl = calculator();
        decl.kind = DeclarationKind::Class;
        assert!(CodeSynthesizer::default().synthesize(&decl).unwrap().is_none());
    }

    #[test]
    fn test_first_function_marker_wins() {
        let decl = ClassDeclaration::interface("com.example", "Calculator.kt", "Calculator")
            .with_annotation(AnnotationInstance::message("AutoGeneratedCalculator", "Generated"))
            .with_function(
                sum_fn("sum", "Int", "first")
                    .with_annotation(AnnotationInstance::message("SUM", "second")),
            );

        let class = CodeSynthesizer::default().synthesize(&decl).unwrap().unwrap();
        assert_eq!(class.method("sum").unwrap().body.message(), "first");
    }

    #[test]
    fn test_missing_class_marker() {
        let decl = ClassDeclaration::interface("com.example", "Adder.kt", "Adder")
            .with_function(sum_fn("sum", "Int", "Adding"));
        let err = CodeSynthesizer::default().synthesize(&decl).unwrap_err();
        assert!(matches!(err, Error::MissingMarker { ref annotation, .. } if annotation == "AutoGeneratedCalculator"));
    }

    #[test]
    fn test_arity_mismatch() {
        let decl = calculator().with_function(
            FunctionDeclaration::new("triple")
                .with_parameter("a", TypeRef::new("Int"))
                .with_parameter("b", TypeRef::new("Int"))
                .with_parameter("c", TypeRef::new("Int"))
                .returning(TypeRef::new("Int"))
                .with_annotation(AnnotationInstance::message("SUM", "Triple")),
        );
        let err = CodeSynthesizer::default().synthesize(&decl).unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { found: 3, .. }));
    }

    #[test]
    fn test_non_numeric_operands() {
        let decl = calculator().with_function(sum_fn("concat", "String", "Concat"));
        let err = CodeSynthesizer::default().synthesize(&decl).unwrap_err();
        assert!(matches!(err, Error::NonNumericOperand { ref type_name, .. } if type_name == "String"));

        let relaxed = CodeSynthesizer::default()
            .with_options(SynthesizerOptions { allow_non_numeric: true, ..Default::default() });
        assert!(relaxed.synthesize(&decl).unwrap().is_some());
    }

    #[test]
    fn test_rejects_names_that_break_the_source() {
        let mut escaping = calculator();
        escaping.id.package = ".tmp.escape".to_string();
        let err = CodeSynthesizer::default().synthesize(&escaping).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { role: "package", ref name, .. } if name == ".tmp.escape"));

        let bad_param = calculator().with_function(
            FunctionDeclaration::new("plus")
                .with_parameter("a) { }; fun b(", TypeRef::new("Int"))
                .with_parameter("y", TypeRef::new("Int"))
                .returning(TypeRef::new("Int"))
                .with_annotation(AnnotationInstance::message("SUM", "Plus")),
        );
        let err = CodeSynthesizer::default().synthesize(&bad_param).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { role: "parameter name", .. }));

        let bad_type = calculator().with_function(sum_fn("plus", "Int\n}", "Plus"));
        let relaxed = CodeSynthesizer::default()
            .with_options(SynthesizerOptions { allow_non_numeric: true, ..Default::default() });
        let err = relaxed.synthesize(&bad_type).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { role: "type name", .. }));
    }

    #[test]
    fn test_numeric_types() {
        assert!(is_numeric(&TypeRef::new("Int")));
        assert!(is_numeric(&TypeRef::new("kotlin.Double")));
        assert!(!is_numeric(&TypeRef::new("Int").nullable()));
        assert!(!is_numeric(&TypeRef::new("java.math.BigDecimal")));
    }

    #[test]
    fn test_file_naming_policy() {
        let synth = CodeSynthesizer::new(Markers::default(), Box::new(FileBaseNamePolicy::default()));
        let mut decl = calculator();
        decl.id.file = "Math.kt".to_string();
        assert_eq!(synth.synthesize(&decl).unwrap().unwrap().name, "MathImpl");
    }
}
