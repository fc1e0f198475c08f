//! Kotlin source rendering for synthesized classes
//!
//! Output is a pure function of the model: the same class always renders to
//! the same bytes.

use super::model::{GeneratedMethod, MethodBody, SynthesizedClass};
use std::fmt::{self, Write};

/// Default extension of generated artifacts
pub const FILE_EXTENSION: &str = "kt";

/// Name of the constructor parameter generated code emits messages through
pub const SINK_PARAMETER: &str = "sink";

const INDENT: &str = "    ";

/// Render a class to Kotlin source.
///
/// The class takes its message sink as a constructor parameter defaulting to
/// `::println`, so callers can capture emitted messages.
pub fn render_class(class: &SynthesizedClass) -> String {
    let mut out = String::new();
    write_class(&mut out, class).expect("writing to a String cannot fail");
    out
}

fn write_class(out: &mut impl Write, class: &SynthesizedClass) -> fmt::Result {
    writeln!(out, "// Generated by implgen from {}. Do not edit.", class.source)?;
    if !class.package.is_empty() {
        writeln!(out, "package {}", class.package)?;
    }
    writeln!(out)?;

    let modifier = if class.is_abstract { "public abstract class" } else { "public class" };
    writeln!(out, "{} {}(", modifier, class.name)?;
    writeln!(out, "{}private val {}: (String) -> Unit = ::println,", INDENT, SINK_PARAMETER)?;
    writeln!(out, ") : {} {{", class.implements)?;

    for (i, method) in class.methods.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write_method(out, method)?;
    }

    writeln!(out, "}}")
}

fn write_method(out: &mut impl Write, method: &GeneratedMethod) -> fmt::Result {
    let modifier = if method.is_override { "override" } else { "public" };
    write!(out, "{}{} fun {}(", INDENT, modifier, method.name)?;
    for (i, param) in method.parameters.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}: {}", param.name, param.ty)?;
    }
    write!(out, ")")?;
    if let Some(return_type) = &method.return_type {
        write!(out, ": {}", return_type)?;
    }
    writeln!(out, " {{")?;

    writeln!(out, "{0}{0}{1}({2})", INDENT, SINK_PARAMETER, string_literal(method.body.message()))?;
    if let MethodBody::EmitThenSum { lhs, rhs, .. } = &method.body {
        writeln!(out, "{0}{0}return {1} + {2}", INDENT, lhs, rhs)?;
    }
    writeln!(out, "{}}}", INDENT)
}

/// Quote a message as a Kotlin string literal.
pub fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '$' => literal.push_str("\\$"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
