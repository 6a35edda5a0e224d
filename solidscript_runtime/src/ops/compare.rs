//! Equality and ordering over value pairs.
//!
//! Equality is structural and total: any two values can be compared and the
//! answer is a boolean (cross-type pairs are simply unequal; two undefined
//! values are equal regardless of their reasons). Ordering is defined only
//! for number/number, string/string and vector/vector pairs; everything
//! else is an undefined result naming the operands. Vector comparison is
//! element-wise and short-circuiting, and an incomparable element pair
//! surfaces as an undefined result carrying the index where the comparison
//! gave up.

use super::undef_binary;
use crate::value::{Value, VectorValue};

impl Value {
    /// `==` - structural equality as a runtime value.
    pub fn equals(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Undefined(_), Value::Undefined(_)) => Value::Bool(true),
            (Value::Bool(a), Value::Bool(b)) => Value::Bool(a == b),
            (Value::Number(a), Value::Number(b)) => Value::Bool(a == b),
            (Value::Str(a), Value::Str(b)) => Value::Bool(a == b),
            (Value::Vector(a), Value::Vector(b)) => vector_equals(a, b),
            (Value::Range(a), Value::Range(b)) => Value::Bool(a == b),
            (Value::Object(a), Value::Object(b)) => a.equals(b),
            (Value::Function(a), Value::Function(b)) => Value::Bool(a.ptr_eq(b)),
            _ => Value::Bool(false),
        }
    }

    /// `!=` - negation of `==`, propagating an undefined comparison
    /// unchanged.
    pub fn not_equals(&self, other: &Value) -> Value {
        match self.equals(other) {
            result @ Value::Undefined(_) => result,
            result => Value::Bool(!result.to_bool()),
        }
    }

    /// `<` - defined for numbers, strings (lexicographic by code point)
    /// and vectors (lexicographic element-wise).
    pub fn less_than(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Bool(a < b),
            (Value::Str(a), Value::Str(b)) => Value::Bool(a < b),
            (Value::Vector(a), Value::Vector(b)) => vector_less_than(a, b),
            (Value::Object(a), Value::Object(b)) => a.less_than(b),
            _ => undef_binary("<", self, other),
        }
    }

    /// `>` - the mirror of `<`.
    pub fn greater_than(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Bool(a > b),
            (Value::Str(a), Value::Str(b)) => Value::Bool(a > b),
            (Value::Vector(a), Value::Vector(b)) => vector_less_than(b, a),
            (Value::Object(a), Value::Object(b)) => a.greater_than(b),
            _ => undef_binary(">", self, other),
        }
    }

    /// `<=` - negation of the strict `>`, except an undefined underlying
    /// comparison passes through unchanged (negating an undefined must not
    /// silently produce a boolean).
    pub fn less_or_equal(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Bool(a <= b),
            (Value::Str(a), Value::Str(b)) => Value::Bool(a <= b),
            (Value::Vector(a), Value::Vector(b)) => negate_comparison(vector_less_than(b, a)),
            (Value::Object(a), Value::Object(b)) => a.less_or_equal(b),
            _ => undef_binary("<=", self, other),
        }
    }

    /// `>=` - negation of the strict `<`, undefined passing through.
    pub fn greater_or_equal(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Bool(a >= b),
            (Value::Str(a), Value::Str(b)) => Value::Bool(a >= b),
            (Value::Vector(a), Value::Vector(b)) => negate_comparison(vector_less_than(a, b)),
            (Value::Object(a), Value::Object(b)) => a.greater_or_equal(b),
            _ => undef_binary(">=", self, other),
        }
    }

    /// Strict-weak-order predicate for sorting; an undefined comparison
    /// counts as "not less".
    pub fn cmp_less(lhs: &Value, rhs: &Value) -> bool {
        lhs.less_than(rhs).to_bool()
    }
}

fn negate_comparison(result: Value) -> Value {
    match result {
        result @ Value::Undefined(_) => result,
        result => Value::Bool(!result.to_bool()),
    }
}

fn vector_equals(lhs: &VectorValue, rhs: &VectorValue) -> Value {
    let mut a = lhs.iter();
    let mut b = rhs.iter();
    let mut index = 0usize;
    loop {
        match (a.next(), b.next()) {
            (Some(x), Some(y)) => match x.equals(&y) {
                Value::Undefined(mut undef) => {
                    undef.append(format!("in vector comparison at index {}", index));
                    return Value::Undefined(undef);
                }
                result => {
                    if !result.to_bool() {
                        return Value::Bool(false);
                    }
                }
            },
            (None, None) => return Value::Bool(true),
            _ => return Value::Bool(false),
        }
        index += 1;
    }
}

/// Lexicographic element-wise `<` with possible undefined result.
fn vector_less_than(lhs: &VectorValue, rhs: &VectorValue) -> Value {
    let mut a = lhs.iter();
    let mut b = rhs.iter();
    let mut index = 0usize;
    loop {
        match (a.next(), b.next()) {
            (Some(x), Some(y)) => match x.less_than(&y) {
                Value::Undefined(mut undef) => {
                    undef.append(format!("in vector comparison at index {}", index));
                    return Value::Undefined(undef);
                }
                result => {
                    if result.to_bool() {
                        return Value::Bool(true);
                    }
                    if y.less_than(&x).to_bool() {
                        return Value::Bool(false);
                    }
                }
            },
            // a common prefix: the shorter vector is the lesser one
            (None, Some(_)) => return Value::Bool(true),
            _ => return Value::Bool(false),
        }
        index += 1;
    }
}
