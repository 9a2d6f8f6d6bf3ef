//! Flattening of arbitrary JSON values into single display strings
//!
//! Captured payloads nest objects arbitrarily deep where a table cell wants
//! one string. This is a lossy, display-oriented projection: deterministic
//! for identical input, not reversible.

use serde_json::Value;

/// Keys tried in order when an object must be reduced to one value
const DISPLAY_KEYS: &[&str] = &[
    "value", "text", "name", "label", "title", "display", "url", "href", "email", "phone",
];

/// Objects with at most this many keys are rendered as `key: value` pairs
const PAIR_RENDER_MAX_KEYS: usize = 4;

/// Reduce an arbitrary JSON value to a single display string
pub fn flatten(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            if items.is_empty() {
                return String::new();
            }
            items
                .iter()
                .map(flatten)
                .collect::<Vec<_>>()
                .join("; ")
        }
        Value::Object(map) => {
            for key in DISPLAY_KEYS {
                if let Some(inner) = map.get(*key) {
                    return flatten(inner);
                }
            }
            if map.len() <= PAIR_RENDER_MAX_KEYS {
                map.iter()
                    .map(|(k, v)| format!("{}: {}", k, flatten(v)))
                    .collect::<Vec<_>>()
                    .join(", ")
            } else {
                // Too many keys to pair-render; fall back to compact JSON
                serde_json::to_string(value).unwrap_or_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_null_and_scalars() {
        assert_eq!(flatten(&Value::Null), "");
        assert_eq!(flatten(&json!("hello")), "hello");
        assert_eq!(flatten(&json!(42)), "42");
        assert_eq!(flatten(&json!(3.5)), "3.5");
        assert_eq!(flatten(&json!(true)), "true");
    }

    #[test]
    fn test_flatten_is_idempotent_on_strings() {
        let once = flatten(&json!("plain"));
        let twice = flatten(&Value::String(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_flatten_primitive_array_joins() {
        assert_eq!(flatten(&json!([])), "");
        assert_eq!(flatten(&json!([1, 2, 3])), "1; 2; 3");
        assert_eq!(flatten(&json!(["a", "b"])), "a; b");
    }

    #[test]
    fn test_flatten_object_array_recurses() {
        let v = json!([{ "name": "Ada" }, { "name": "Grace" }]);
        assert_eq!(flatten(&v), "Ada; Grace");
    }

    #[test]
    fn test_flatten_object_priority_keys() {
        assert_eq!(flatten(&json!({ "value": 7, "name": "x" })), "7");
        assert_eq!(flatten(&json!({ "label": "L", "title": "T" })), "L");
        assert_eq!(flatten(&json!({ "href": "https://e.test" })), "https://e.test");
    }

    #[test]
    fn test_flatten_priority_key_present_but_null() {
        // A present-but-null display key still wins (and flattens to "")
        assert_eq!(flatten(&json!({ "value": null, "other": "x" })), "");
    }

    #[test]
    fn test_flatten_small_object_pair_renders() {
        let v = json!({ "city": "Oslo", "zip": "0150" });
        assert_eq!(flatten(&v), "city: Oslo, zip: 0150");
    }

    #[test]
    fn test_flatten_large_object_falls_back_to_json() {
        let v = json!({ "a": 1, "b": 2, "c": 3, "d": 4, "e": 5 });
        let out = flatten(&v);
        assert_eq!(out, serde_json::to_string(&v).unwrap());
    }

    #[test]
    fn test_flatten_nested_object_in_pair_render() {
        let v = json!({ "who": { "name": "Ada" } });
        assert_eq!(flatten(&v), "who: Ada");
    }
}
