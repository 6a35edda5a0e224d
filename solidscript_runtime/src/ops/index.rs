//! Bracket indexing across the indexable value kinds.
//!
//! Strings index by Unicode code point, vectors by logical position,
//! objects by key, ranges by the fixed slots 0/1/2 (begin, step, end).
//! Numeric indices go through a saturating double→u32 conversion: NaN,
//! infinities and out-of-range doubles all land on `u32::MAX`, which
//! guarantees a deterministic out-of-bounds result instead of a wrapped
//! index.

use crate::value::Value;

/// Saturating double→u32 index conversion.
fn index_to_u32(index: f64) -> u32 {
    if index.is_finite() && (0.0..=u32::MAX as f64).contains(&index) {
        index as u32
    } else {
        u32::MAX
    }
}

impl Value {
    /// The `[]` operator.
    pub fn index(&self, index: &Value) -> Value {
        match (self, index) {
            (Value::Str(s), Value::Number(n)) => {
                let i = index_to_u32(*n) as usize;
                match s.char_at(i) {
                    Some(ch) => Value::from(ch),
                    None => Value::undefined(),
                }
            }
            (Value::Vector(v), Value::Number(n)) => {
                let i = index_to_u32(*n) as usize;
                match v.get(i) {
                    Some(element) => element,
                    None => Value::undef(format!(
                        "index {} out of bounds for vector of size {}",
                        i,
                        v.len()
                    )),
                }
            }
            (Value::Object(o), Value::Str(key)) => o.get(key.as_str()),
            (Value::Range(r), Value::Number(n)) => match index_to_u32(*n) {
                0 => Value::Number(r.begin_value()),
                1 => Value::Number(r.step_value()),
                2 => Value::Number(r.end_value()),
                _ => Value::undef(
                    "subscript operator only defined for indices 0-2 on range (begin,step,end)",
                ),
            },
            _ => Value::undef(format!(
                "undefined operation {}[{}]",
                self.type_name(),
                index.type_name()
            )),
        }
    }

    /// Convenience `[]` with a host-side index.
    pub fn index_at(&self, index: usize) -> Value {
        self.index(&Value::Number(index as f64))
    }
}
