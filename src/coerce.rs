//! Lenient scalar coercion for NDJSON fields.
//!
//! The exporters that produce the source corpora are loose about scalar
//! encodings: integer fields arrive as JSON numbers or as numeric strings
//! (`"39"`), floats likewise, and absent values as `null` or `""`. The
//! statement-binding layer wants native `i64`/`f64`, so every numeric field
//! is funneled through these helpers, either directly on a
//! [`serde_json::Value`] or as a `deserialize_with` adapter on the record
//! structs.
//!
//! Coercion never recurses: a nested array or object where a scalar is
//! expected is not coercible and surfaces as a malformed record upstream.
//! Non-numeric scalars pass through the record types untouched.

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

/// Interpret a JSON value as a native integer.
///
/// Accepts integer numbers, floats with no fractional part, and strings
/// containing either. Returns `None` for anything else, including nested
/// containers.
pub fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

/// Interpret a JSON value as a native float.
///
/// Accepts any JSON number and strings that parse as one. Returns `None`
/// for anything else, including nested containers.
pub fn float_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Null and the empty string both mean "no value" in the activity log
/// (logged-out events carry `"userId": ""`).
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// `deserialize_with` adapter: required integer field.
pub fn int_lenient<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    int_from_value(&value)
        .ok_or_else(|| de::Error::custom(format!("cannot interpret {value} as an integer")))
}

/// `deserialize_with` adapter: optional integer field (`null`/`""` → `None`).
pub fn opt_int_lenient<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_absent(&value) {
        return Ok(None);
    }
    int_from_value(&value)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("cannot interpret {value} as an integer")))
}

/// `deserialize_with` adapter: required float field.
pub fn float_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    float_from_value(&value)
        .ok_or_else(|| de::Error::custom(format!("cannot interpret {value} as a float")))
}

/// `deserialize_with` adapter: optional float field (`null`/`""` → `None`).
pub fn opt_float_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_absent(&value) {
        return Ok(None);
    }
    float_from_value(&value)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("cannot interpret {value} as a float")))
}
