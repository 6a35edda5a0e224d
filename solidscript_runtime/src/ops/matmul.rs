//! Vector and matrix multiplication.
//!
//! `vector * vector` carries four meanings, chosen by the type of each
//! operand's first element: dot product (number/number first elements),
//! row×matrix (number/vector), matrix×column (vector/number) and
//! matrix×matrix (vector/vector). Matrices are plain vectors of row
//! vectors; every shape violation names the offending row, column or index
//! in its diagnostic so the message is actionable without a debugger.

use crate::value::{Value, ValueType, VectorValue};

/// Vector × Number: scalar broadcast over every element.
pub(super) fn multiply_vector_scalar(vector: &VectorValue, scalar: &Value) -> Value {
    let mut product = VectorValue::new(vector.session());
    for element in vector.iter() {
        product.push(element.multiply(scalar));
    }
    Value::Vector(product)
}

/// Vector × Vector: dispatch on the first elements' types.
pub(super) fn multiply_vector_vector(lhs: &VectorValue, rhs: &VectorValue) -> Value {
    let (Some(first1), Some(first2)) = (lhs.iter().next(), rhs.iter().next()) else {
        return Value::undef("Multiplication is undefined on empty vectors");
    };
    match (first1.value_type(), first2.value_type()) {
        (ValueType::Number, ValueType::Number) => {
            if lhs.len() == rhs.len() {
                dot_product(lhs, rhs)
            } else {
                Value::undef(format!(
                    "vector*vector requires matching lengths ({} != {})",
                    lhs.len(),
                    rhs.len()
                ))
            }
        }
        (ValueType::Number, ValueType::Vector) => {
            if lhs.len() == rhs.len() {
                multiply_row_matrix(lhs, rhs)
            } else {
                Value::undef(format!(
                    "vector*matrix requires vector length to match matrix row count ({} != {})",
                    lhs.len(),
                    rhs.len()
                ))
            }
        }
        (ValueType::Vector, ValueType::Number) => {
            let column_count = first1.to_vector().len();
            if column_count == rhs.len() {
                multiply_matrix_column(lhs, rhs)
            } else {
                Value::undef(format!(
                    "matrix*vector requires matrix column count to match vector length ({} != {})",
                    column_count,
                    rhs.len()
                ))
            }
        }
        (ValueType::Vector, ValueType::Vector) => {
            let column_count = first1.to_vector().len();
            if column_count == rhs.len() {
                multiply_matrix_matrix(lhs, rhs)
            } else {
                Value::undef(format!(
                    "matrix*matrix requires left operand column count to match right operand row count ({} != {})",
                    column_count,
                    rhs.len()
                ))
            }
        }
        _ => Value::undef(format!(
            "undefined vector*vector multiplication where first elements are types {} and {}",
            first1.type_name(),
            first2.type_name()
        )),
    }
}

/// Sum of pairwise products; every element on both sides must be a number.
fn dot_product(lhs: &VectorValue, rhs: &VectorValue) -> Value {
    let mut sum = 0.0;
    for (x, y) in lhs.iter().zip(rhs.iter()) {
        match (&x, &y) {
            (Value::Number(a), Value::Number(b)) => sum += a * b,
            _ => {
                return Value::undef(format!(
                    "undefined operation ({} * {})",
                    x.type_name(),
                    y.type_name()
                ));
            }
        }
    }
    Value::Number(sum)
}

/// Matrix × column vector: one result element per matrix row.
fn multiply_matrix_column(matrix: &VectorValue, column: &VectorValue) -> Value {
    let column_values: Vec<Value> = column.iter().collect();
    let mut product = VectorValue::new(matrix.session());
    for (i, row) in matrix.iter().enumerate() {
        let row_vector = match &row {
            Value::Vector(r) if r.len() == column_values.len() => r.clone(),
            _ => {
                return Value::undef(format!("Matrix must be rectangular. Problem at row {}", i));
            }
        };
        let mut sum = 0.0;
        for (j, cell) in row_vector.iter().enumerate() {
            let Value::Number(m) = cell else {
                return Value::undef(format!(
                    "Matrix must contain only numbers. Problem at row {}, col {}",
                    i, j
                ));
            };
            let Some(Value::Number(v)) = column_values.get(j) else {
                return Value::undef(format!(
                    "Vector must contain only numbers. Problem at index {}",
                    j
                ));
            };
            sum += m * v;
        }
        product.push(Value::Number(sum));
    }
    Value::Vector(product)
}

/// Row vector × matrix: one result element per matrix column, so the
/// result length is the matrix's row width.
fn multiply_row_matrix(row: &VectorValue, matrix: &VectorValue) -> Value {
    let row_values: Vec<Value> = row.iter().collect();
    let matrix_rows: Vec<Value> = matrix.iter().collect();
    let (first_row_width, session) = match matrix_rows.first() {
        Some(Value::Vector(r)) => (r.len(), r.session()),
        _ => return Value::undef("Matrix must be rectangular. Problem at row 0"),
    };
    let mut product = VectorValue::new(session);
    for i in 0..first_row_width {
        let mut sum = 0.0;
        for (j, matrix_row) in matrix_rows.iter().enumerate() {
            let row_vector = match matrix_row {
                Value::Vector(r) if r.len() == first_row_width => r,
                _ => {
                    return Value::undef(format!(
                        "Matrix must be rectangular. Problem at row {}",
                        j
                    ));
                }
            };
            let Some(Value::Number(v)) = row_values.get(j) else {
                return Value::undef(format!(
                    "Vector must contain only numbers. Problem at index {}",
                    j
                ));
            };
            let Some(Value::Number(m)) = row_vector.get(i) else {
                return Value::undef(format!(
                    "Matrix must contain only numbers. Problem at row {}, col {}",
                    j, i
                ));
            };
            sum += v * m;
        }
        product.push(Value::Number(sum));
    }
    Value::Vector(product)
}

/// Matrix × matrix: each left row times the right matrix, with row-level
/// failures propagated upward carrying the row index.
fn multiply_matrix_matrix(lhs: &VectorValue, rhs: &VectorValue) -> Value {
    let mut product = VectorValue::new(lhs.session());
    for (i, source_row) in lhs.iter().enumerate() {
        let row_vector = source_row.to_vector();
        if row_vector.len() != rhs.len() {
            return Value::undef(format!(
                "matrix*matrix left operand row length does not match right operand row count ({} != {}) at row {}",
                row_vector.len(),
                rhs.len(),
                i
            ));
        }
        match multiply_row_matrix(&row_vector, rhs) {
            Value::Undefined(mut undef) => {
                undef.append(format!("while processing left operand at row {}", i));
                return Value::Undefined(undef);
            }
            row_product => product.push(row_product),
        }
    }
    Value::Vector(product)
}

#[cfg(test)]
mod tests {
    use crate::value::{Value, VectorValue};

    fn numbers(values: &[f64]) -> Value {
        Value::Vector(VectorValue::from_values(
            None,
            values.iter().map(|&n| Value::Number(n)),
        ))
    }

    fn matrix(rows: &[&[f64]]) -> Value {
        Value::Vector(VectorValue::from_values(
            None,
            rows.iter().map(|row| numbers(row)),
        ))
    }

    fn as_numbers(value: &Value) -> Vec<f64> {
        match value {
            Value::Vector(v) => v.iter().map(|e| e.to_f64()).collect(),
            other => unreachable!("expected vector, got {:?}", other),
        }
    }

    fn as_rows(value: &Value) -> Vec<Vec<f64>> {
        match value {
            Value::Vector(v) => v.iter().map(|row| as_numbers(&row)).collect(),
            other => unreachable!("expected vector, got {:?}", other),
        }
    }

    fn undef_reason(value: Value) -> String {
        match value {
            Value::Undefined(u) => u.to_reason_string(),
            other => unreachable!("expected undefined, got {:?}", other),
        }
    }

    // ── scalar broadcast ──────────────────────────────────────────────────────

    #[test]
    fn test_matmul_scalar_broadcast_both_sides() {
        let doubled = numbers(&[1.0, 2.0, 3.0]).multiply(&Value::Number(2.0));
        assert_eq!(as_numbers(&doubled), vec![2.0, 4.0, 6.0]);
        let tripled = Value::Number(3.0).multiply(&numbers(&[1.0, 2.0]));
        assert_eq!(as_numbers(&tripled), vec![3.0, 6.0]);
    }

    // ── dot product ───────────────────────────────────────────────────────────

    #[test]
    fn test_matmul_dot_product() {
        let dot = numbers(&[1.0, 2.0, 3.0]).multiply(&numbers(&[4.0, 5.0, 6.0]));
        assert_eq!(dot.to_f64(), 32.0);
    }

    #[test]
    fn test_matmul_dot_product_length_mismatch_names_lengths() {
        let result = numbers(&[1.0, 2.0, 3.0]).multiply(&numbers(&[4.0, 5.0]));
        assert_eq!(
            undef_reason(result),
            "vector*vector requires matching lengths (3 != 2)"
        );
    }

    // ── row × matrix / matrix × column ────────────────────────────────────────

    #[test]
    fn test_matmul_row_times_matrix() {
        let row = numbers(&[1.0, 2.0]);
        let m = matrix(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let product = row.multiply(&m);
        assert_eq!(as_numbers(&product), vec![9.0, 12.0, 15.0]);
    }

    #[test]
    fn test_matmul_matrix_times_column() {
        let m = matrix(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let column = numbers(&[5.0, 6.0]);
        let product = m.multiply(&column);
        assert_eq!(as_numbers(&product), vec![17.0, 39.0]);
    }

    #[test]
    fn test_matmul_row_matrix_length_mismatch() {
        let row = numbers(&[1.0, 2.0, 3.0]);
        let m = matrix(&[&[1.0], &[2.0]]);
        assert_eq!(
            undef_reason(row.multiply(&m)),
            "vector*matrix requires vector length to match matrix row count (3 != 2)"
        );
    }

    #[test]
    fn test_matmul_ragged_matrix_names_offending_row() {
        let m = matrix(&[&[1.0, 2.0], &[3.0]]);
        let column = numbers(&[5.0, 6.0]);
        assert_eq!(
            undef_reason(m.multiply(&column)),
            "Matrix must be rectangular. Problem at row 1"
        );
    }

    #[test]
    fn test_matmul_non_numeric_cell_names_row_and_col() {
        let bad_row = Value::Vector(VectorValue::from_values(
            None,
            [Value::Number(1.0), Value::from("x")],
        ));
        let m = Value::Vector(VectorValue::from_values(
            None,
            [numbers(&[1.0, 2.0]), bad_row],
        ));
        let column = numbers(&[5.0, 6.0]);
        assert_eq!(
            undef_reason(m.multiply(&column)),
            "Matrix must contain only numbers. Problem at row 1, col 1"
        );
    }

    // ── matrix × matrix ───────────────────────────────────────────────────────

    #[test]
    fn test_matmul_matrix_times_matrix() {
        let a = matrix(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = matrix(&[&[5.0, 6.0], &[7.0, 8.0]]);
        let product = a.multiply(&b);
        assert_eq!(as_rows(&product), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }

    #[test]
    fn test_matmul_matrix_matrix_shape_mismatch() {
        let a = matrix(&[&[1.0, 2.0, 3.0]]);
        let b = matrix(&[&[1.0], &[2.0]]);
        assert_eq!(
            undef_reason(a.multiply(&b)),
            "matrix*matrix requires left operand column count to match right operand row count (3 != 2)"
        );
    }

    #[test]
    fn test_matmul_matrix_matrix_row_failure_appends_row_index() {
        // second left row is ragged relative to the right operand
        let a = Value::Vector(VectorValue::from_values(
            None,
            [numbers(&[1.0, 2.0]), numbers(&[1.0, 2.0, 3.0])],
        ));
        let b = matrix(&[&[1.0, 0.0], &[0.0, 1.0]]);
        let reason = undef_reason(a.multiply(&b));
        assert!(reason.contains("at row 1"), "got: {}", reason);
    }

    // ── refusals ──────────────────────────────────────────────────────────────

    #[test]
    fn test_matmul_empty_vector_is_refused() {
        let empty = Value::Vector(VectorValue::empty());
        assert_eq!(
            undef_reason(empty.multiply(&numbers(&[1.0]))),
            "Multiplication is undefined on empty vectors"
        );
    }

    #[test]
    fn test_matmul_mixed_first_elements_are_undefined() {
        let strings = Value::Vector(VectorValue::from_values(None, [Value::from("x")]));
        let reason = undef_reason(strings.multiply(&numbers(&[1.0])));
        assert_eq!(
            reason,
            "undefined vector*vector multiplication where first elements are types string and number"
        );
    }
}
