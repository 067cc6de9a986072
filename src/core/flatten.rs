use crate::domain::model::{FlatRow, GenericValue};

pub const PATH_SEPARATOR: &str = "/";

/// 將巢狀物件攤平成單層，鍵以 `/` 串接
///
/// 陣列不會展開，直接作為葉節點值保留；鍵衝突時以後寫入者為準。
pub fn flatten(value: &serde_json::Map<String, GenericValue>, prefix: &str) -> FlatRow {
    let mut result = FlatRow::new();
    flatten_into(value, prefix, &mut result);
    result
}

fn flatten_into(value: &serde_json::Map<String, GenericValue>, prefix: &str, result: &mut FlatRow) {
    for (key, val) in value {
        let new_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", prefix, PATH_SEPARATOR, key)
        };

        match val {
            GenericValue::Object(nested) => flatten_into(nested, &new_key, result),
            leaf => {
                result.insert(new_key, leaf.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(value: GenericValue) -> GenericValue {
        let map = value.as_object().cloned().unwrap();
        GenericValue::Object(flatten(&map, ""))
    }

    #[test]
    fn test_nested_objects_join_with_slash() {
        assert_eq!(
            flat(json!({"a": {"b": 1, "c": 2}})),
            json!({"a/b": 1, "a/c": 2})
        );
        assert_eq!(
            flat(json!({"x": {"y": {"z": "deep"}}, "top": true})),
            json!({"x/y/z": "deep", "top": true})
        );
    }

    #[test]
    fn test_arrays_pass_through() {
        assert_eq!(flat(json!({"a": [1, 2, 3]})), json!({"a": [1, 2, 3]}));
        assert_eq!(
            flat(json!({"a": {"list": [{"b": 1}]}})),
            json!({"a/list": [{"b": 1}]})
        );
    }

    #[test]
    fn test_flat_input_keeps_keys() {
        let input = json!({"id": 1, "name": "n", "missing": null});
        assert_eq!(flat(input.clone()), input);
    }

    #[test]
    fn test_prefix_is_applied() {
        let map = json!({"b": 1}).as_object().cloned().unwrap();
        let row = flatten(&map, "a");
        assert_eq!(row.get("a/b"), Some(&json!(1)));
    }

    #[test]
    fn test_no_container_values_except_arrays() {
        let row = flat(json!({"a": {"b": {"c": {}}, "d": {"e": [1]}}, "f": "g"}));
        let row = row.as_object().unwrap();
        assert!(row.values().all(|v| !v.is_object()));
        // 空物件沒有任何葉節點
        assert!(!row.contains_key("a/b/c"));
    }

    #[test]
    fn test_key_order_follows_document_order() {
        let row = flat(json!({"z": 1, "a": {"m": 2, "b": 3}, "k": 4}));
        let keys: Vec<&String> = row.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a/m", "a/b", "k"]);
    }

    #[test]
    fn test_collision_last_write_wins() {
        let row = flat(json!({"a/b": "scalar", "a": {"b": "nested"}}));
        assert_eq!(row, json!({"a/b": "nested"}));

        let row = flat(json!({"a": {"b": "nested"}, "a/b": "scalar"}));
        assert_eq!(row, json!({"a/b": "scalar"}));
    }
}
