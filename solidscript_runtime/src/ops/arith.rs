//! Arithmetic, bitwise and unary operators.
//!
//! Bitwise operators work on numbers by truncating toward zero to a 64-bit
//! integer first (the one centralized rounding choice, see
//! [`Value::to_trunc_integer`]). Two deliberate language quirks live here:
//! vector `+`/`-` truncate to the shorter operand, and `^` is
//! exponentiation rather than XOR.

use super::{matmul, undef_binary};
use crate::value::{Value, VectorValue};

impl Value {
    /// `+` - numbers add; vectors add element-wise over the shorter length.
    pub fn add(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
            (Value::Vector(a), Value::Vector(b)) => {
                let mut sum = VectorValue::new(a.session());
                // zip truncates to the shorter operand; the longer vector's
                // tail is dropped silently
                for (x, y) in a.iter().zip(b.iter()) {
                    sum.push(x.add(&y));
                }
                Value::Vector(sum)
            }
            _ => undef_binary("+", self, other),
        }
    }

    /// `-` - mirror of `+`.
    pub fn subtract(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a - b),
            (Value::Vector(a), Value::Vector(b)) => {
                let mut difference = VectorValue::new(a.session());
                for (x, y) in a.iter().zip(b.iter()) {
                    difference.push(x.subtract(&y));
                }
                Value::Vector(difference)
            }
            _ => undef_binary("-", self, other),
        }
    }

    /// `*` - numbers multiply; number/vector broadcasts; vector/vector
    /// dispatches on the first elements into dot product, row×matrix,
    /// matrix×column or matrix×matrix.
    pub fn multiply(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a * b),
            (Value::Number(_), Value::Vector(v)) => matmul::multiply_vector_scalar(v, self),
            (Value::Vector(v), Value::Number(_)) => matmul::multiply_vector_scalar(v, other),
            (Value::Vector(a), Value::Vector(b)) => matmul::multiply_vector_vector(a, b),
            _ => undef_binary("*", self, other),
        }
    }

    /// `/` - numbers divide; vector/number and number/vector broadcast
    /// element-wise; vector/vector is undefined.
    pub fn divide(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a / b),
            (Value::Vector(v), Value::Number(_)) => {
                let mut quotient = VectorValue::new(v.session());
                for element in v.iter() {
                    quotient.push(element.divide(other));
                }
                Value::Vector(quotient)
            }
            (Value::Number(_), Value::Vector(v)) => {
                let mut quotient = VectorValue::new(v.session());
                for element in v.iter() {
                    quotient.push(self.divide(&element));
                }
                Value::Vector(quotient)
            }
            _ => undef_binary("/", self, other),
        }
    }

    /// `%` - truncating-division remainder on numbers only.
    pub fn modulo(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a % b),
            _ => undef_binary("%", self, other),
        }
    }

    /// `<<` - shift amounts outside `[0, 64)` are refused with distinct
    /// diagnostics.
    pub fn shift_left(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(_), Value::Number(_)) => {
                let lhs = self.to_i64();
                let rhs = other.to_i64();
                if rhs < 0 {
                    return Value::undef("negative shift");
                }
                if rhs >= 64 {
                    return Value::undef("shift too large");
                }
                Value::Number(lhs.wrapping_shl(rhs as u32) as f64)
            }
            _ => undef_binary("<<", self, other),
        }
    }

    /// `>>` - arithmetic right shift with the same bounds as `<<`.
    pub fn shift_right(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(_), Value::Number(_)) => {
                let lhs = self.to_i64();
                let rhs = other.to_i64();
                if rhs < 0 {
                    return Value::undef("negative shift");
                }
                if rhs >= 64 {
                    return Value::undef("shift too large");
                }
                Value::Number(lhs.wrapping_shr(rhs as u32) as f64)
            }
            _ => undef_binary(">>", self, other),
        }
    }

    /// `&` on truncated 64-bit integers.
    pub fn bit_and(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(_), Value::Number(_)) => {
                Value::Number((self.to_i64() & other.to_i64()) as f64)
            }
            _ => undef_binary("&", self, other),
        }
    }

    /// `|` on truncated 64-bit integers.
    pub fn bit_or(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(_), Value::Number(_)) => {
                Value::Number((self.to_i64() | other.to_i64()) as f64)
            }
            _ => undef_binary("|", self, other),
        }
    }

    /// `^` - exponentiation. A language-level choice, not a typo: there is
    /// no bitwise XOR operator.
    pub fn pow(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a.powf(*b)),
            _ => undef_binary("^", self, other),
        }
    }

    /// Unary `-` - negates a number, element-wise negates a vector.
    pub fn negate(&self) -> Value {
        match self {
            Value::Number(n) => Value::Number(-n),
            Value::Vector(v) => {
                let mut negated = VectorValue::new(v.session());
                for element in v.iter() {
                    negated.push(element.negate());
                }
                Value::Vector(negated)
            }
            _ => Value::undef(format!("undefined operation (-{})", self.type_name())),
        }
    }

    /// Unary `~` - bitwise NOT on the truncated 64-bit integer.
    pub fn bit_not(&self) -> Value {
        match self {
            Value::Number(_) => Value::Number(!self.to_i64() as f64),
            _ => Value::undef(format!("undefined operation (~{})", self.type_name())),
        }
    }
}
