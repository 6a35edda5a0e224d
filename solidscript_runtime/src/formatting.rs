//! Number and value formatting.
//!
//! `format_number` is the single source of truth for number-to-text
//! conversion: printing, echo output, range and vector stringification all
//! go through it, so a number renders identically everywhere it appears.
//!
//! Value stringification lives here too. It recurses into nested vectors
//! and objects behind a depth guard; exceeding [`MAX_PRINT_DEPTH`] is
//! reported as a recoverable [`RuntimeError::TooDeeplyNested`] rather than
//! overflowing the call stack.

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::{ObjectValue, Value, VectorValue};

/// Significant digits requested from the number formatter.
const PRECISION: usize = 6;

/// Most leading zeros tolerated after the decimal point before switching to
/// exponent notation (`0.00001` stays fixed, `1e-6` does not).
const MAX_LEADING_ZEROES: i32 = 5;

/// Deepest nesting the stringifier will traverse before giving up.
pub const MAX_PRINT_DEPTH: usize = 256;

/// Format a double as its shortest 6-significant-digit decimal text.
///
/// Non-finite values render literally (`inf`, `-inf`, `nan`), negative zero
/// collapses to `0`, trailing fractional zeros are stripped, and an
/// exponent suffix (with an explicit sign) is preserved and relocated past
/// any stripped zeros: `1.50000e+7` becomes `1.5e+7`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        // unique zero: -0.0 renders as 0
        return "0".to_string();
    }

    // Round to 6 significant digits, then re-render from the digit string.
    let rounded = format!("{:.*e}", PRECISION - 1, value);
    let Some((mantissa, exponent)) = rounded.split_once('e') else {
        return rounded;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    // Position of the decimal point relative to the start of `digits`.
    let decimal_point = exponent + 1;
    let too_many_leading_zeroes = -decimal_point + 1 > MAX_LEADING_ZEROES;
    let too_many_trailing_digits = decimal_point - PRECISION as i32 > 0;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if too_many_leading_zeroes || too_many_trailing_digits {
        // Exponent notation: one digit, trimmed fraction, signed exponent.
        let fraction = digits[1..].trim_end_matches('0');
        out.push_str(&digits[..1]);
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(fraction);
        }
        out.push('e');
        out.push_str(if exponent < 0 { "-" } else { "+" });
        out.push_str(&exponent.abs().to_string());
    } else if decimal_point <= 0 {
        out.push_str("0.");
        for _ in 0..-decimal_point {
            out.push('0');
        }
        out.push_str(digits.trim_end_matches('0'));
    } else if decimal_point as usize >= digits.len() {
        out.push_str(&digits);
        for _ in digits.len()..decimal_point as usize {
            out.push('0');
        }
    } else {
        let (whole, fraction) = digits.split_at(decimal_point as usize);
        out.push_str(whole);
        let fraction = fraction.trim_end_matches('0');
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(fraction);
        }
    }
    out
}

/// Stringify a value for display. Top-level strings render bare; strings
/// inside vectors and objects are quoted.
pub(crate) fn format_value(value: &Value) -> RuntimeResult<String> {
    if let Value::Str(s) = value {
        return Ok(s.as_str().to_string());
    }
    let mut out = String::new();
    write_value(&mut out, value, 0)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value, depth: usize) -> RuntimeResult<()> {
    match value {
        Value::Undefined(_) => out.push_str("undef"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::Str(s) => {
            out.push('"');
            out.push_str(s.as_str());
            out.push('"');
        }
        Value::Vector(v) => write_vector(out, v, depth)?,
        // Internal variant; only reachable through a store that was never
        // flattened, where it stands for its flattened content.
        Value::EmbeddedVector(e) => write_vector(out, &e.to_vector(), depth)?,
        Value::Range(r) => out.push_str(&r.to_string()),
        Value::Object(o) => write_object(out, o, depth)?,
        Value::Function(f) => out.push_str(f.repr()),
    }
    Ok(())
}

fn write_vector(out: &mut String, vector: &VectorValue, depth: usize) -> RuntimeResult<()> {
    if depth >= MAX_PRINT_DEPTH {
        return Err(RuntimeError::TooDeeplyNested {
            max_depth: MAX_PRINT_DEPTH,
        });
    }
    out.push('[');
    let mut first = true;
    for element in vector.iter() {
        if !first {
            out.push_str(", ");
        }
        first = false;
        write_value(out, &element, depth + 1)?;
    }
    out.push(']');
    Ok(())
}

fn write_object(out: &mut String, object: &ObjectValue, depth: usize) -> RuntimeResult<()> {
    if depth >= MAX_PRINT_DEPTH {
        return Err(RuntimeError::TooDeeplyNested {
            max_depth: MAX_PRINT_DEPTH,
        });
    }
    out.push_str("{ ");
    for (key, value) in object.entries() {
        out.push_str(&key);
        out.push_str(" = ");
        write_value(out, &value, depth + 1)?;
        out.push_str("; ");
    }
    out.push('}');
    Ok(())
}
