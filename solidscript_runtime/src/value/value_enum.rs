//! Value - the tagged-union runtime value.
//!
//! Every expression in the language evaluates to a `Value`. Exactly one
//! variant is active at a time; there is no implicit coercion between
//! variants except where the operator tables define one. Heap-backed
//! variants (string, vector, object, range, function) are cheap aliasing
//! handles protected by copy-on-write at their mutation points.

use std::rc::Rc;

use crate::error::RuntimeResult;
use crate::formatting::format_value;
use crate::value::{
    EmbeddedVectorValue, FunctionValue, ObjectValue, RangeValue, UndefValue, Utf8String,
    VectorValue,
};

/// Runtime value of the modeling language.
#[derive(Debug, Clone)]
pub enum Value {
    /// The undefined sentinel, optionally carrying diagnostic reasons.
    Undefined(UndefValue),
    Bool(bool),
    Number(f64),
    Str(Utf8String),
    /// Ordered sequence with shared, embeddable storage.
    Vector(VectorValue),
    /// Internal splice marker; only ever stored inside a vector's backing
    /// store, never returned to the evaluator.
    EmbeddedVector(EmbeddedVectorValue),
    /// Lazy arithmetic progression.
    Range(Rc<RangeValue>),
    /// Ordered string-keyed map.
    Object(ObjectValue),
    /// Opaque closure handle.
    Function(FunctionValue),
}

/// Type tag for [`Value`] variants, used by the operator dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Undefined,
    Bool,
    Number,
    String,
    Vector,
    EmbeddedVector,
    Range,
    Object,
    Function,
}

impl ValueType {
    /// The name used in diagnostics, e.g. `undefined operation (string + number)`.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Undefined => "undefined",
            ValueType::Bool => "bool",
            ValueType::Number => "number",
            ValueType::String => "string",
            // The internal splice marker reads as its flattened content.
            ValueType::Vector | ValueType::EmbeddedVector => "vector",
            ValueType::Range => "range",
            ValueType::Object => "object",
            ValueType::Function => "function",
        }
    }
}

impl Value {
    /// The plain undefined value, no diagnostic attached.
    pub fn undefined() -> Self {
        Value::Undefined(UndefValue::new())
    }

    /// An undefined value carrying a diagnostic reason.
    pub fn undef(reason: impl Into<String>) -> Self {
        Value::Undefined(UndefValue::with_reason(reason))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Undefined(_) => ValueType::Undefined,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(_) => ValueType::Number,
            Value::Str(_) => ValueType::String,
            Value::Vector(_) => ValueType::Vector,
            Value::EmbeddedVector(_) => ValueType::EmbeddedVector,
            Value::Range(_) => ValueType::Range,
            Value::Object(_) => ValueType::Object,
            Value::Function(_) => ValueType::Function,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined(_))
    }

    /// Undefined *with* a pending diagnostic: the evaluator warns when such
    /// a value surfaces unchecked.
    pub fn is_unchecked_undef(&self) -> bool {
        matches!(self, Value::Undefined(u) if !u.is_empty())
    }

    /// Truthiness: undefined is false, numbers compare against zero,
    /// strings/vectors/objects are true when non-empty, ranges and
    /// functions are always true.
    pub fn to_bool(&self) -> bool {
        match self {
            Value::Undefined(_) => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Vector(v) => !v.is_empty(),
            Value::EmbeddedVector(e) => !e.is_empty(),
            Value::Range(_) => true,
            Value::Object(o) => !o.is_empty(),
            Value::Function(_) => true,
        }
    }

    /// The numeric payload, or 0.0 for every other variant.
    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            _ => 0.0,
        }
    }

    pub fn get_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn get_finite_f64(&self) -> Option<f64> {
        self.get_f64().filter(|n| n.is_finite())
    }

    /// Finite number in `[0, u32::MAX]`, truncated.
    pub fn get_unsigned_int(&self) -> Option<u32> {
        self.get_finite_f64()
            .filter(|&n| (0.0..=u32::MAX as f64).contains(&n))
            .map(|n| n as u32)
    }

    /// Finite number in `[1, u32::MAX]`, truncated.
    pub fn get_positive_int(&self) -> Option<u32> {
        self.get_finite_f64()
            .filter(|&n| (1.0..=u32::MAX as f64).contains(&n))
            .map(|n| n as u32)
    }

    /// The value as a double with an integer value, for use in bitwise
    /// operations. Several roundings would do (floor, ceil, round, trunc);
    /// this function centralizes the choice on truncation for consistency.
    pub fn to_trunc_integer(&self) -> f64 {
        self.to_f64().trunc()
    }

    pub fn to_i64(&self) -> i64 {
        self.to_trunc_integer() as i64
    }

    pub fn as_string(&self) -> Option<&Utf8String> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The vector payload, or a detached empty vector for any other
    /// variant. Callers that must distinguish check `value_type()` first.
    pub fn to_vector(&self) -> VectorValue {
        match self {
            Value::Vector(v) => v.clone(),
            _ => VectorValue::empty(),
        }
    }

    /// The object payload, or a detached empty object for any other
    /// variant.
    pub fn to_object(&self) -> ObjectValue {
        match self {
            Value::Object(o) => o.clone(),
            _ => ObjectValue::empty(),
        }
    }

    pub fn as_range(&self) -> Option<&RangeValue> {
        match self {
            Value::Range(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Destructure a 2-element numeric vector.
    pub fn get_vec2(&self, ignore_infinite: bool) -> Option<(f64, f64)> {
        let Value::Vector(v) = self else {
            return None;
        };
        if v.len() != 2 {
            return None;
        }
        let fetch = |value: Value| {
            if ignore_infinite {
                value.get_finite_f64()
            } else {
                value.get_f64()
            }
        };
        Some((fetch(v.get(0)?)?, fetch(v.get(1)?)?))
    }

    /// Destructure a 3-element numeric vector.
    pub fn get_vec3(&self) -> Option<(f64, f64, f64)> {
        let Value::Vector(v) = self else {
            return None;
        };
        if v.len() != 3 {
            return None;
        }
        Some((
            v.get(0)?.get_f64()?,
            v.get(1)?.get_f64()?,
            v.get(2)?.get_f64()?,
        ))
    }

    /// Like [`get_vec3`](Self::get_vec3), but a 2-element vector is
    /// accepted with `default_z` filling the third component.
    pub fn get_vec3_or(&self, default_z: f64) -> Option<(f64, f64, f64)> {
        let Value::Vector(v) = self else {
            return None;
        };
        if v.len() == 2 {
            let (x, y) = self.get_vec2(false)?;
            return Some((x, y, default_z));
        }
        self.get_vec3()
    }

    /// Interpret the value as text built from Unicode scalar values: a
    /// number is its code point (empty for zero, negatives and invalid
    /// scalars), a vector concatenates its elements, a range concatenates
    /// its values unless it is at or above the iteration cap (then empty:
    /// refused, not truncated). Everything else is empty.
    pub fn chr_string(&self) -> String {
        match self {
            Value::Number(n) => {
                if *n <= 0.0 {
                    return String::new();
                }
                match char::from_u32(*n as u32) {
                    Some(c) if c != '\0' => c.to_string(),
                    _ => String::new(),
                }
            }
            Value::Vector(v) => v.iter().map(|element| element.chr_string()).collect(),
            Value::Range(r) => match r.values() {
                Ok(values) => values.map(|d| Value::Number(d).chr_string()).collect(),
                // at or above the iteration cap: refused, not truncated
                Err(_) => String::new(),
            },
            _ => String::new(),
        }
    }

    /// Stringify for display; fails only when the value is nested beyond
    /// the print guard.
    pub fn to_display_string(&self) -> RuntimeResult<String> {
        format_value(self)
    }

    /// Like display, but top-level strings are quoted, matching what
    /// `echo()` prints.
    pub fn to_echo_string(&self) -> RuntimeResult<String> {
        match self {
            Value::Str(s) => Ok(format!("\"{}\"", s.as_str())),
            _ => self.to_display_string(),
        }
    }

    /// Echo text that never fails: the print guard degrades to `"..."`.
    pub fn to_echo_string_lossy(&self) -> String {
        self.to_echo_string()
            .unwrap_or_else(|_| "...".to_string())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::undefined()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_display_string() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("..."),
        }
    }
}

// ========== From implementations ==========

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Utf8String::new(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Utf8String::new(v))
    }
}

impl From<Utf8String> for Value {
    fn from(v: Utf8String) -> Self {
        Value::Str(v)
    }
}

impl From<VectorValue> for Value {
    fn from(v: VectorValue) -> Self {
        Value::Vector(v)
    }
}

impl From<EmbeddedVectorValue> for Value {
    fn from(v: EmbeddedVectorValue) -> Self {
        Value::EmbeddedVector(v)
    }
}

impl From<RangeValue> for Value {
    fn from(v: RangeValue) -> Self {
        Value::Range(Rc::new(v))
    }
}

impl From<ObjectValue> for Value {
    fn from(v: ObjectValue) -> Self {
        Value::Object(v)
    }
}

impl From<FunctionValue> for Value {
    fn from(v: FunctionValue) -> Self {
        Value::Function(v)
    }
}

// ========== Literal-subset serialization ==========

/// Helper enum for serializing the subset of Value variants that are
/// serializable: the scalar literals. Containers carry shared state and
/// never round-trip through serde.
#[derive(serde::Serialize, serde::Deserialize)]
enum SerializableValue {
    Undefined,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sv = match self {
            Value::Undefined(_) => SerializableValue::Undefined,
            Value::Bool(b) => SerializableValue::Bool(*b),
            Value::Number(n) => SerializableValue::Number(*n),
            Value::Str(s) => SerializableValue::Str(s.as_str().to_string()),
            other => {
                return Err(serde::ser::Error::custom(format!(
                    "cannot serialize value of type {}",
                    other.type_name()
                )));
            }
        };
        sv.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let sv = SerializableValue::deserialize(deserializer)?;
        Ok(match sv {
            SerializableValue::Undefined => Value::undefined(),
            SerializableValue::Bool(b) => Value::Bool(b),
            SerializableValue::Number(n) => Value::Number(n),
            SerializableValue::Str(s) => Value::Str(Utf8String::new(s)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time coverage test for ALL Value variants.
    ///
    /// Constructs every variant and exercises the basic accessors through
    /// an exhaustive match, so adding a variant without updating this test
    /// fails to compile.
    #[test]
    fn test_all_value_variants_constructed() {
        let all_values: Vec<Value> = vec![
            Value::undefined(),
            Value::Bool(true),
            Value::Number(1.5),
            Value::from("text"),
            Value::Vector(VectorValue::empty()),
            Value::EmbeddedVector(VectorValue::empty().into()),
            Value::from(RangeValue::new(0.0, 1.0, 3.0)),
            Value::Object(ObjectValue::empty()),
            Value::Function(FunctionValue::new("function(x) x")),
        ];

        for v in &all_values {
            match v {
                Value::Undefined(_)
                | Value::Bool(_)
                | Value::Number(_)
                | Value::Str(_)
                | Value::Vector(_)
                | Value::EmbeddedVector(_)
                | Value::Range(_)
                | Value::Object(_)
                | Value::Function(_) => {}
            }
            let _ = format!("{:?}", v);
            let _ = v.value_type();
            let _ = v.type_name();
            let _ = v.to_bool();
        }
        assert_eq!(all_values.len(), 9);
    }

    // ── type names ────────────────────────────────────────────────────────────

    #[test]
    fn test_value_type_names() {
        assert_eq!(Value::undefined().type_name(), "undefined");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Number(0.0).type_name(), "number");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::Vector(VectorValue::empty()).type_name(), "vector");
        assert_eq!(
            Value::from(RangeValue::new(0.0, 1.0, 2.0)).type_name(),
            "range"
        );
        assert_eq!(Value::Object(ObjectValue::empty()).type_name(), "object");
        assert_eq!(
            Value::Function(FunctionValue::new("f")).type_name(),
            "function"
        );
    }

    // ── conversions ───────────────────────────────────────────────────────────

    #[test]
    fn test_value_to_bool_table() {
        assert!(!Value::undefined().to_bool());
        assert!(!Value::Bool(false).to_bool());
        assert!(Value::Bool(true).to_bool());
        assert!(!Value::Number(0.0).to_bool());
        assert!(Value::Number(-2.0).to_bool());
        assert!(!Value::from("").to_bool());
        assert!(Value::from("x").to_bool());
        assert!(!Value::Vector(VectorValue::empty()).to_bool());
        assert!(Value::from(RangeValue::new(5.0, 1.0, 1.0)).to_bool());
        assert!(Value::Function(FunctionValue::new("f")).to_bool());
    }

    #[test]
    fn test_value_to_f64_defaults_to_zero() {
        assert_eq!(Value::Number(2.5).to_f64(), 2.5);
        assert_eq!(Value::Bool(true).to_f64(), 0.0);
        assert_eq!(Value::from("3").to_f64(), 0.0);
    }

    #[test]
    fn test_value_trunc_integer_truncates_toward_zero() {
        assert_eq!(Value::Number(2.9).to_trunc_integer(), 2.0);
        assert_eq!(Value::Number(-2.9).to_trunc_integer(), -2.0);
        assert_eq!(Value::Number(-2.9).to_i64(), -2);
    }

    #[test]
    fn test_value_get_unsigned_int_bounds() {
        assert_eq!(Value::Number(4.7).get_unsigned_int(), Some(4));
        assert_eq!(Value::Number(-1.0).get_unsigned_int(), None);
        assert_eq!(Value::Number(f64::INFINITY).get_unsigned_int(), None);
        assert_eq!(Value::Number(0.5).get_positive_int(), None);
        assert_eq!(Value::Number(1.0).get_positive_int(), Some(1));
    }

    #[test]
    fn test_value_out_of_type_views_fall_back_to_empty() {
        assert!(Value::Number(1.0).to_vector().is_empty());
        assert!(Value::Number(1.0).to_object().is_empty());
        assert!(Value::Number(1.0).as_range().is_none());
        assert!(Value::Number(1.0).as_function().is_none());
    }

    #[test]
    fn test_value_get_vec3_variants() {
        let v: Value = VectorValue::from_xyz(None, 1.0, 2.0, 3.0).into();
        assert_eq!(v.get_vec3(), Some((1.0, 2.0, 3.0)));

        let v2: Value = VectorValue::from_values(
            None,
            [Value::Number(1.0), Value::Number(2.0)],
        )
        .into();
        assert_eq!(v2.get_vec3(), None);
        assert_eq!(v2.get_vec3_or(7.0), Some((1.0, 2.0, 7.0)));
        assert_eq!(v2.get_vec2(false), Some((1.0, 2.0)));
    }

    #[test]
    fn test_value_get_vec2_ignore_infinite() {
        let v: Value = VectorValue::from_values(
            None,
            [Value::Number(1.0), Value::Number(f64::INFINITY)],
        )
        .into();
        assert_eq!(v.get_vec2(false), Some((1.0, f64::INFINITY)));
        assert_eq!(v.get_vec2(true), None);
    }

    // ── chr_string ────────────────────────────────────────────────────────────

    #[test]
    fn test_value_chr_string_number() {
        assert_eq!(Value::Number(65.0).chr_string(), "A");
        assert_eq!(Value::Number(233.0).chr_string(), "é");
        assert_eq!(Value::Number(0.0).chr_string(), "");
        assert_eq!(Value::Number(-5.0).chr_string(), "");
    }

    #[test]
    fn test_value_chr_string_vector_concatenates() {
        let v: Value = VectorValue::from_values(
            None,
            [Value::Number(104.0), Value::Number(105.0)],
        )
        .into();
        assert_eq!(v.chr_string(), "hi");
    }

    #[test]
    fn test_value_chr_string_range_refuses_over_cap() {
        let ok: Value = RangeValue::new(97.0, 1.0, 99.0).into();
        assert_eq!(ok.chr_string(), "abc");
        let unbounded: Value = RangeValue::new(97.0, 0.0, 99.0).into();
        assert_eq!(unbounded.chr_string(), "");
    }

    // ── serde literal subset ──────────────────────────────────────────────────

    #[test]
    fn test_value_literal_subset_round_trips() {
        for v in [
            Value::undefined(),
            Value::Bool(true),
            Value::Number(1.25),
            Value::from("hello"),
        ] {
            let json = serde_json::to_string(&v).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert!(v.equals(&back).to_bool(), "{:?} -> {}", v, json);
        }
    }

    #[test]
    fn test_value_containers_do_not_serialize() {
        let v = Value::Vector(VectorValue::empty());
        assert!(serde_json::to_string(&v).is_err());
    }
}
