//! Literal coercion for string-typed filter values.
//!
//! GraphQL front ends usually deliver every filter value as a string. When
//! enabled, strings that spell a literal are turned into that literal before
//! the query is built.

use serde_json::{Number, Value};

/// Coerce a filter value.
///
/// - `"null"` → null
/// - `"true"` / `"false"` → bool
/// - integer or float strings → number
/// - `"(a,b,c)"` → list of strings
///
/// Anything else, and every non-string value, is returned unchanged. List
/// elements are coerced individually.
pub fn coerce_literal(value: Value) -> Value {
    match value {
        Value::String(s) => coerce_str(s),
        Value::Array(items) => Value::Array(items.into_iter().map(coerce_literal).collect()),
        other => other,
    }
}

fn coerce_str(value: String) -> Value {
    // List syntax: (a,b,c)
    if value.len() >= 2 && value.starts_with('(') && value.ends_with(')') {
        let inner = &value[1..value.len() - 1];
        let items: Vec<Value> = inner
            .split(',')
            .map(|s| Value::String(s.trim().to_string()))
            .collect();
        return Value::Array(items);
    }

    match value.as_str() {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(n) = value.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = value.parse::<f64>() {
        if let Some(num) = Number::from_f64(n) {
            return Value::Number(num);
        }
    }

    Value::String(value)
}
