//! Runtime operator dispatch.
//!
//! Every operator resolves on the runtime pair of operand variants; there
//! is no fixed coercion table. Combinations outside an operator's
//! allow-list evaluate to an undefined value whose reason names the
//! operator and both operand types, so the evaluator can surface an
//! actionable warning without a debugger.
//!
//! Operators never mutate their operands; results are freshly constructed
//! or cheaply cloned values.

mod arith;
mod compare;
mod index;
mod matmul;

use crate::value::Value;

/// The standard `undefined operation (<lhs> <op> <rhs>)` result.
pub(crate) fn undef_binary(op: &str, lhs: &Value, rhs: &Value) -> Value {
    Value::undef(format!(
        "undefined operation ({} {} {})",
        lhs.type_name(),
        op,
        rhs.type_name()
    ))
}

/// Binary operation selector, the evaluator-facing dispatch surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    /// `^` is exponentiation in this language, not bitwise XOR; there is no
    /// XOR operator.
    Pow,
    Index,
}

impl BinOp {
    /// The operator's source spelling, as used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::Pow => "^",
            BinOp::Index => "[]",
        }
    }
}

/// Unary operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    BitNot,
}

impl UnOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::BitNot => "~",
        }
    }
}

/// Apply a binary operator, dispatching on the operand pair.
pub fn apply_binop(op: BinOp, lhs: &Value, rhs: &Value) -> Value {
    match op {
        BinOp::Eq => lhs.equals(rhs),
        BinOp::Ne => lhs.not_equals(rhs),
        BinOp::Lt => lhs.less_than(rhs),
        BinOp::Le => lhs.less_or_equal(rhs),
        BinOp::Gt => lhs.greater_than(rhs),
        BinOp::Ge => lhs.greater_or_equal(rhs),
        BinOp::Add => lhs.add(rhs),
        BinOp::Sub => lhs.subtract(rhs),
        BinOp::Mul => lhs.multiply(rhs),
        BinOp::Div => lhs.divide(rhs),
        BinOp::Mod => lhs.modulo(rhs),
        BinOp::Shl => lhs.shift_left(rhs),
        BinOp::Shr => lhs.shift_right(rhs),
        BinOp::BitAnd => lhs.bit_and(rhs),
        BinOp::BitOr => lhs.bit_or(rhs),
        BinOp::Pow => lhs.pow(rhs),
        BinOp::Index => lhs.index(rhs),
    }
}

/// Apply a unary operator.
pub fn apply_unop(op: UnOp, operand: &Value) -> Value {
    match op {
        UnOp::Neg => operand.negate(),
        UnOp::BitNot => operand.bit_not(),
    }
}
