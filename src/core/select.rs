use crate::domain::model::GenericValue;

/// 判斷值是否為「有值」：null、false、0、空字串皆視為無值
pub fn is_truthy(value: &GenericValue) -> bool {
    match value {
        GenericValue::Null => false,
        GenericValue::Bool(b) => *b,
        GenericValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        GenericValue::String(s) => !s.is_empty(),
        GenericValue::Array(_) | GenericValue::Object(_) => true,
    }
}

/// 依點號分隔的路徑（例如 `clearing.operation`）取出子節點
///
/// 任何一段找不到或值為 falsy 時回傳 `None`，因此存在但為 `0`、`false`、`""`
/// 的值與不存在無法區分。
pub fn select<'a>(root: &'a GenericValue, path: &str) -> Option<&'a GenericValue> {
    path.split('.')
        .try_fold(root, |current, segment| {
            current
                .as_object()
                .and_then(|map| map.get(segment))
                .filter(|value| is_truthy(value))
        })
        .filter(|value| is_truthy(value))
}
