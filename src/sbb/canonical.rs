use std::collections::BTreeMap;

use serde_json::Value;

/// Rewrite a [`Value`] tree so every object's keys are emitted in sorted
/// order, then serialize it compactly. This makes hashing independent of a
/// particular `Map` implementation's insertion-order behavior: any
/// `#[derive(Serialize)]` struct can feed this function without manually
/// sorting its own fields.
pub fn canonicalize(value: &Value) -> String {
    serde_json::to_string(&sort_keys(value)).expect("canonical JSON values always serialize")
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map.iter().map(|(k, v)| (k.clone(), sort_keys(v))).collect();
            serde_json::to_value(sorted).expect("a BTreeMap<String, Value> always round-trips to Value::Object")
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_object_keys_regardless_of_insertion_order() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(canonicalize(&a), canonicalize(&b));
    }

    #[test]
    fn is_compact_with_no_inserted_whitespace() {
        let v = json!({"a": [1, 2, 3]});
        assert_eq!(canonicalize(&v), r#"{"a":[1,2,3]}"#);
    }

    #[test]
    fn sorts_nested_objects() {
        let v = json!({"z": {"b": 1, "a": 2}, "a": 1});
        assert_eq!(canonicalize(&v), r#"{"a":1,"z":{"a":2,"b":1}}"#);
    }
}
