use crate::domain::model::{GenericValue, ATTRIBUTE_MARKER};

/// 將 XML 解析樹整理成一般的巢狀 JSON 結構
///
/// - 只有一個元素的陣列會被展開成該元素本身
/// - 物件中的屬性鍵 `$` 會被移除
/// - 其他純量值原樣保留
pub fn clean(value: GenericValue) -> GenericValue {
    match value {
        GenericValue::Array(mut items) if items.len() == 1 => clean(items.remove(0)),
        GenericValue::Array(items) => GenericValue::Array(items.into_iter().map(clean).collect()),
        GenericValue::Object(map) => GenericValue::Object(
            map.into_iter()
                .filter(|(key, _)| key != ATTRIBUTE_MARKER)
                .map(|(key, value)| (key, clean(value)))
                .collect(),
        ),
        scalar => scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contains_attribute_marker(value: &GenericValue) -> bool {
        match value {
            GenericValue::Object(map) => {
                map.contains_key(ATTRIBUTE_MARKER) || map.values().any(contains_attribute_marker)
            }
            GenericValue::Array(items) => items.iter().any(contains_attribute_marker),
            _ => false,
        }
    }

    #[test]
    fn test_single_element_arrays_collapse() {
        let input = json!({"root": {"item": ["1"], "nested": [{"leaf": ["x"]}]}});
        assert_eq!(
            clean(input),
            json!({"root": {"item": "1", "nested": {"leaf": "x"}}})
        );
    }

    #[test]
    fn test_multi_element_arrays_keep_order() {
        let input = json!({"op": [{"id": ["1"]}, {"id": ["2"]}, {"id": ["3"]}]});
        assert_eq!(
            clean(input),
            json!({"op": [{"id": "1"}, {"id": "2"}, {"id": "3"}]})
        );
    }

    #[test]
    fn test_attribute_marker_is_stripped() {
        assert_eq!(clean(json!({"$": {"id": "7"}, "a": "x"})), json!({"a": "x"}));

        let deep = json!({
            "clearing": [{
                "$": {"version": "2"},
                "operation": [
                    {"$": {"type": "debit"}, "_": "text", "amount": ["10"]},
                    {"$": {"type": "credit"}, "amount": ["20"]}
                ]
            }]
        });
        let cleaned = clean(deep);
        assert!(!contains_attribute_marker(&cleaned));
        assert_eq!(
            cleaned,
            json!({
                "clearing": {
                    "operation": [
                        {"_": "text", "amount": "10"},
                        {"amount": "20"}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_scalars_and_empty_containers_unchanged() {
        assert_eq!(clean(json!(null)), json!(null));
        assert_eq!(clean(json!(false)), json!(false));
        assert_eq!(clean(json!(3.5)), json!(3.5));
        assert_eq!(clean(json!("text")), json!("text"));
        assert_eq!(clean(json!([])), json!([]));
        assert_eq!(clean(json!({})), json!({}));
    }

    #[test]
    fn test_nested_single_arrays_collapse_fully() {
        assert_eq!(clean(json!([[["deep"]]])), json!("deep"));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = vec![
            json!({"root": {"item": ["1"], "$": {"a": "b"}}}),
            json!([{"a": [1, 2]}, {"b": [[3]]}]),
            json!({"x": [{"y": [{"z": ["v"]}]}]}),
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(once.clone()), once);
        }
    }
}
