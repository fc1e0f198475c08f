//! Direct evaluation of synthesized methods
//!
//! Runs a method model with the same observable behavior as the rendered
//! source: messages go to a `MessageSink`, sums return a `Value`.

use super::model::{MethodBody, SynthesizedClass};
use crate::symbol::TypeRef;
use crate::{Error, Result};
use std::fmt;

/// Side channel generated code emits messages through.
pub trait MessageSink {
    fn emit(&mut self, message: &str);
}

/// Prints every message on its own line, like the rendered default.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn emit(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Records messages in emission order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub messages: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageSink for RecordingSink {
    fn emit(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Runtime value passed to or returned from a generated method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Unit,
    Int(i64),
    Float(f64),
}

impl Value {
    fn as_i64(self) -> i64 {
        match self {
            Value::Int(v) => v,
            Value::Float(v) => v as i64,
            Value::Unit => 0,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
            Value::Unit => 0.0,
        }
    }
}

/// Arithmetic a generated `a + b` performs, ordered by Kotlin's operand promotion.
///
/// `Byte`, `Short` and `Int` operands add as 32-bit `Int`; types outside the
/// numeric set (only reachable with `allow_non_numeric`) add as `Long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Arithmetic {
    Int32,
    Int64,
    Float32,
    Float64,
}

impl Arithmetic {
    pub fn of(ty: &TypeRef) -> Self {
        match ty.name.strip_prefix("kotlin.").unwrap_or(&ty.name) {
            "Byte" | "Short" | "Int" => Arithmetic::Int32,
            "Float" => Arithmetic::Float32,
            "Double" => Arithmetic::Float64,
            _ => Arithmetic::Int64,
        }
    }

    /// The wider of the two operand kinds
    pub fn for_operands(lhs: &TypeRef, rhs: &TypeRef) -> Self {
        Self::of(lhs).max(Self::of(rhs))
    }

    /// Reject values the declared operand type cannot hold
    fn check(self, value: Value) -> Result<Value> {
        match (self, value) {
            (_, Value::Unit) => Err(Error::Eval("Unit is not an operand".to_string())),
            (Arithmetic::Int32, Value::Int(v)) if i32::try_from(v).is_err() => {
                Err(Error::Eval(format!("{} does not fit in Int", v)))
            }
            (Arithmetic::Int32 | Arithmetic::Int64, Value::Float(v)) => {
                Err(Error::Eval(format!("{} is not an integer operand", v)))
            }
            (_, value) => Ok(value),
        }
    }

    /// Add checked operands; integers wrap at the operand width like JVM arithmetic
    fn add(self, lhs: Value, rhs: Value) -> Value {
        match self {
            Arithmetic::Int32 => Value::Int(i64::from((lhs.as_i64() as i32).wrapping_add(rhs.as_i64() as i32))),
            Arithmetic::Int64 => Value::Int(lhs.as_i64().wrapping_add(rhs.as_i64())),
            Arithmetic::Float32 => Value::Float(f64::from(lhs.as_f64() as f32 + rhs.as_f64() as f32)),
            Arithmetic::Float64 => Value::Float(lhs.as_f64() + rhs.as_f64()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Unit"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl SynthesizedClass {
    /// Invoke `method` with positional `args`, emitting through `sink`.
    ///
    /// Arguments are checked against the declared parameter types before
    /// anything is emitted, so a rejected call has no side effect. Sums emit
    /// their message first, then add.
    pub fn invoke(&self, method: &str, args: &[Value], sink: &mut dyn MessageSink) -> Result<Value> {
        let target = self
            .methods
            .iter()
            .find(|m| m.name == method && m.parameters.len() == args.len())
            .ok_or_else(|| Error::Eval(format!("{} has no method {}/{}", self.name, method, args.len())))?;

        match &target.body {
            MethodBody::Emit { message } => {
                sink.emit(message);
                Ok(Value::Unit)
            }
            MethodBody::EmitThenSum { message, .. } => {
                let [first, second] = target.parameters.as_slice() else {
                    return Err(Error::Eval(format!("{}.{} is not a binary sum", self.name, method)));
                };
                let arithmetic = Arithmetic::for_operands(&first.ty, &second.ty);
                let lhs = arithmetic.check(args[0])?;
                let rhs = arithmetic.check(args[1])?;
                sink.emit(message);
                Ok(arithmetic.add(lhs, rhs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{AnnotationInstance, ClassDeclaration, FunctionDeclaration};
    use crate::synth::CodeSynthesizer;

    fn sum_fn(name: &str, ty: &str) -> FunctionDeclaration {
        FunctionDeclaration::new(name)
            .with_parameter("x", TypeRef::new(ty))
            .with_parameter("y", TypeRef::new(ty))
            .returning(TypeRef::new(ty))
            .with_annotation(AnnotationInstance::message("SUM", "Adding"))
    }

    fn calculator() -> SynthesizedClass {
        let decl = ClassDeclaration::interface("com.example", "Calculator.kt", "Calculator")
            .with_annotation(AnnotationInstance::message("AutoGeneratedCalculator", "Generated"))
            .with_function(sum_fn("sum", "Int"))
            .with_function(sum_fn("plusLong", "Long"))
            .with_function(sum_fn("plusFloat", "Float"))
            .with_function(sum_fn("plusDouble", "kotlin.Double"));
        CodeSynthesizer::default().synthesize(&decl).unwrap().unwrap()
    }

    #[test]
    fn test_sum_emits_once_then_returns() {
        let class = calculator();
        let mut sink = RecordingSink::new();

        let result = class.invoke("sum", &[Value::Int(1), Value::Int(2)], &mut sink).unwrap();
        assert_eq!(result, Value::Int(3));
        assert_eq!(sink.messages, vec!["Adding"]);
    }

    #[test]
    fn test_sum_law() {
        let class = calculator();
        for (a, b) in [(0, 0), (-5, 7), (40, 2), (i32::MAX as i64 - 1, 1)] {
            let mut sink = RecordingSink::new();
            let result = class.invoke("sum", &[a.into(), b.into()], &mut sink).unwrap();
            assert_eq!(result, Value::Int(a + b));
            assert_eq!(sink.messages.len(), 1);
        }
    }

    #[test]
    fn test_report_emits_message() {
        let class = calculator();
        let mut sink = RecordingSink::new();
        assert_eq!(class.invoke("report", &[], &mut sink).unwrap(), Value::Unit);
        assert_eq!(sink.messages, vec!["Generated"]);
    }

    #[test]
    fn test_floating_sums() {
        let class = calculator();
        let mut sink = RecordingSink::new();

        let result = class.invoke("plusDouble", &[Value::Int(1), Value::Float(0.5)], &mut sink).unwrap();
        assert_eq!(result, Value::Float(1.5));

        let result = class.invoke("plusFloat", &[Value::Float(0.1), Value::Float(0.2)], &mut sink).unwrap();
        assert_eq!(result, Value::Float(f64::from(0.1f32 + 0.2f32)));
    }

    #[test]
    fn test_int_sum_wraps_at_32_bits() {
        let class = calculator();
        let mut sink = RecordingSink::new();
        let result = class.invoke("sum", &[Value::Int(i32::MAX as i64), Value::Int(1)], &mut sink).unwrap();
        assert_eq!(result, Value::Int(i32::MIN as i64));
        assert_eq!(sink.messages, vec!["Adding"]);
    }

    #[test]
    fn test_long_sum_wraps_at_64_bits() {
        let class = calculator();
        let mut sink = RecordingSink::new();
        let result = class.invoke("plusLong", &[Value::Int(i64::MAX), Value::Int(1)], &mut sink).unwrap();
        assert_eq!(result, Value::Int(i64::MIN));
    }

    #[test]
    fn test_operand_promotion() {
        assert_eq!(Arithmetic::for_operands(&TypeRef::new("Byte"), &TypeRef::new("Short")), Arithmetic::Int32);
        assert_eq!(Arithmetic::for_operands(&TypeRef::new("Int"), &TypeRef::new("Long")), Arithmetic::Int64);
        assert_eq!(Arithmetic::for_operands(&TypeRef::new("Long"), &TypeRef::new("Float")), Arithmetic::Float32);
        assert_eq!(Arithmetic::for_operands(&TypeRef::new("Float"), &TypeRef::new("kotlin.Double")), Arithmetic::Float64);
    }

    #[test]
    fn test_rejected_call_has_no_side_effect() {
        let class = calculator();
        let mut sink = RecordingSink::new();

        assert!(class.invoke("sum", &[Value::Unit, Value::Int(1)], &mut sink).is_err());
        assert!(class.invoke("sum", &[Value::Int(1)], &mut sink).is_err());
        assert!(class.invoke("sum", &[Value::Int(i64::MAX), Value::Int(1)], &mut sink).is_err());
        assert!(class.invoke("plusLong", &[Value::Float(0.5), Value::Int(1)], &mut sink).is_err());
        assert!(sink.messages.is_empty());
    }
}
