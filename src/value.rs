//! Blank / filled predicates over input values.
//!
//! Input values are [`serde_json::Value`] so that typed bodies keep their
//! types. The blank rules are loose on scalars and strict on strings:
//!
//! | Value | Blank? |
//! |---|---|
//! | `null` | yes |
//! | `""`, `"   "` | yes |
//! | `"0"` | **no** (strings are only blank when whitespace) |
//! | `0`, `0.0` | yes |
//! | `false` | yes |
//! | `[]`, `{}` | yes |
//! | anything else | no |

use serde_json::Value;

/// Returns `true` when `value` carries no usable content.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
    }
}

/// The negation of [`is_blank`].
pub fn is_filled(value: &Value) -> bool {
    !is_blank(value)
}
