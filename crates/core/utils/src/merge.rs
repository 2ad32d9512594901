//! Recursive merging of JSON objects.

use serde_json::{Map, Value};

/// Merges two JSON objects, with values from `a` taking precedence.
///
/// Keys present only in `b` are kept. Where both sides hold an object under
/// the same key the two are merged recursively; any other value from `a`,
/// arrays included, replaces the one in `b`.
///
/// When `b` is not an object, `a` is returned unchanged. When `a` is not an
/// object, `b` is returned.
///
/// ```
/// use imaginify_utils::merge::deep_merge;
/// use serde_json::json;
///
/// let merged = deep_merge(
///     &json!({ "config": { "fill": true } }),
///     &json!({ "config": { "restore": true }, "title": "x" }),
/// );
/// assert_eq!(merged, json!({ "config": { "fill": true, "restore": true }, "title": "x" }));
/// ```
pub fn deep_merge(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => Value::Object(merge_maps(a, b)),
        (Value::Object(_), _) => a.clone(),
        _ => b.clone(),
    }
}

fn merge_maps(a: &Map<String, Value>, b: &Map<String, Value>) -> Map<String, Value> {
    let mut output = b.clone();
    for (key, value) in a {
        let merged = match (value, b.get(key)) {
            (Value::Object(inner_a), Some(Value::Object(inner_b))) => {
                Value::Object(merge_maps(inner_a, inner_b))
            }
            _ => value.clone(),
        };
        output.insert(key.clone(), merged);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_a_wins_on_conflict() {
        let merged = deep_merge(&json!({ "a": 1, "shared": "left" }), &json!({ "b": 2, "shared": "right" }));
        assert_eq!(merged, json!({ "a": 1, "b": 2, "shared": "left" }));
    }

    #[test]
    fn test_nested_objects_merge() {
        let merged = deep_merge(
            &json!({ "remove": { "prompt": "cat" } }),
            &json!({ "remove": { "prompt": "dog", "removeShadow": true }, "restore": true }),
        );
        assert_eq!(
            merged,
            json!({ "remove": { "prompt": "cat", "removeShadow": true }, "restore": true })
        );
    }

    #[test]
    fn test_arrays_and_scalars_replace() {
        let merged = deep_merge(
            &json!({ "tags": ["x"], "inner": 5 }),
            &json!({ "tags": ["y", "z"], "inner": { "deep": true } }),
        );
        assert_eq!(merged, json!({ "tags": ["x"], "inner": 5 }));
    }

    #[test]
    fn test_non_object_sides() {
        let a = json!({ "k": 1 });
        assert_eq!(deep_merge(&a, &Value::Null), a);
        assert_eq!(deep_merge(&json!(3), &a), a);
    }
}
