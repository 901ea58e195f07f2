use super::{EvalError, Value};

/// Default number of decimals shown for non-integer results.
pub const DEFAULT_DECIMALS: usize = 2;

/// Format an evaluation result for display in a cell.
pub fn format_result(result: &Result<Value, EvalError>, decimals: usize) -> String {
    match result {
        Ok(Value::Number(n)) => format_number(*n, decimals),
        Ok(Value::Text(s)) => s.clone(),
        Err(e) => e.code().to_string(),
    }
}

/// Format a number for display.
pub fn format_number(n: f64, decimals: usize) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n == 0.0 {
        // Avoid rendering negative zero as "-0".
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{:.*}", decimals, n)
    }
}
