//! Annotation Resolver - typed argument extraction and generation directives
//!
//! Annotation names are matched exactly once, here. Everything downstream
//! works on the closed `Directive` set.

use crate::{Error, Result};
use crate::symbol::{AnnotationInstance, AnnotationValue, ClassDeclaration};
use crate::uri::DeclarationId;
use serde::{Deserialize, Serialize};

/// Default class-level marker name
pub const DEFAULT_CLASS_MARKER: &str = "AutoGeneratedCalculator";
/// Default function-level marker name
pub const DEFAULT_FUNCTION_MARKER: &str = "SUM";

/// The two annotation names the engine recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    /// Marks an interface for synthesis; first argument is the report message
    pub class: String,
    /// Marks an interface function for a generated sum body; first argument is the call message
    pub function: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            class: DEFAULT_CLASS_MARKER.to_string(),
            function: DEFAULT_FUNCTION_MARKER.to_string(),
        }
    }
}

/// Get the argument at `index`, failing with `MissingArgument` when absent.
pub fn argument<'a>(
    owner: &DeclarationId,
    annotation: &'a AnnotationInstance,
    index: usize,
) -> Result<&'a AnnotationValue> {
    annotation.arguments.get(index).ok_or_else(|| Error::MissingArgument {
        declaration: owner.clone(),
        annotation: annotation.name.clone(),
        index,
    })
}

/// Get the first argument of an annotation instance.
pub fn first_argument<'a>(owner: &DeclarationId, annotation: &'a AnnotationInstance) -> Result<&'a AnnotationValue> {
    argument(owner, annotation, 0)
}

/// Resolve the first argument as a message string.
pub fn message_argument<'a>(owner: &DeclarationId, annotation: &'a AnnotationInstance) -> Result<&'a str> {
    let value = first_argument(owner, annotation)?;
    value.as_str().ok_or_else(|| Error::InvalidArgument {
        declaration: owner.clone(),
        annotation: annotation.name.clone(),
        expected: "String",
        actual: value.type_name().to_string(),
    })
}

/// First instance of `name` in declaration order.
///
/// Multiple instances are not an error: the first one wins and the rest are
/// only logged. Hosts do not guarantee annotation order is stable, so
/// generated output must not depend on anything but the first instance.
pub fn find_first<'a>(annotations: &'a [AnnotationInstance], name: &str) -> Option<&'a AnnotationInstance> {
    let mut matching = annotations.iter().filter(|a| a.matches(name));
    let first = matching.next()?;
    let ignored = matching.count();
    if ignored > 0 {
        tracing::debug!("@{} repeated {} more time(s); using the first instance", name, ignored);
    }
    Some(first)
}

/// A typed generation instruction resolved from one annotation instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Emit a `report()` method printing `message`
    Report { message: String },
    /// Override the function at `position` to print `message` and return the
    /// sum of its two parameters
    Sum { function: String, position: usize, message: String },
}

/// All directives resolved for one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDirectives {
    pub declaration: DeclarationId,
    /// Report directive first (if any), then sum directives in function order
    pub directives: Vec<Directive>,
}

impl InterfaceDirectives {
    /// Resolve directives for a declaration.
    ///
    /// Fails with `MissingArgument`/`InvalidArgument` when a marker lacks its
    /// message; this aborts the round.
    pub fn resolve(declaration: &ClassDeclaration, markers: &Markers) -> Result<Self> {
        let owner = &declaration.id;
        let mut directives = Vec::new();

        if let Some(marker) = find_first(&declaration.annotations, &markers.class) {
            let message = message_argument(owner, marker)?;
            directives.push(Directive::Report { message: message.to_string() });
        }

        for (position, function) in declaration.functions.iter().enumerate() {
            if let Some(marker) = find_first(&function.annotations, &markers.function) {
                let message = message_argument(owner, marker)?;
                directives.push(Directive::Sum {
                    function: function.name.clone(),
                    position,
                    message: message.to_string(),
                });
            }
        }

        Ok(Self {
            declaration: owner.clone(),
            directives,
        })
    }

    /// Message of the report directive
    pub fn report(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match d {
            Directive::Report { message } => Some(message.as_str()),
            _ => None,
        })
    }

    /// Sum directives as `(function, message)` pairs in function order
    pub fn sums(&self) -> impl Iterator<Item = (&str, &str)> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Sum { function, message, .. } => Some((function.as_str(), message.as_str())),
            _ => None,
        })
    }

    /// Message for the function at `position`, if it carries a sum directive
    pub fn sum_at(&self, position: usize) -> Option<&str> {
        self.directives.iter().find_map(|d| match d {
            Directive::Sum { position: p, message, .. } if *p == position => Some(message.as_str()),
            _ => None,
        })
    }
}
