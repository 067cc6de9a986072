use crate::domain::model::{FlatRow, GenericValue};
use crate::utils::error::{ConvertError, Result};

/// 由所有列的鍵聯集（依首次出現順序）組成表頭
pub fn collect_headers(rows: &[FlatRow]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

fn cell_to_string(value: &GenericValue) -> Result<String> {
    match value {
        GenericValue::Null => Ok(String::new()),
        GenericValue::Bool(b) => Ok(b.to_string()),
        GenericValue::Number(n) => Ok(n.to_string()),
        GenericValue::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}

/// 將攤平後的資料列輸出成含表頭的 CSV 文字
pub fn rows_to_csv(rows: &[FlatRow]) -> Result<String> {
    if rows.is_empty() {
        return Ok(String::new());
    }

    let headers = collect_headers(rows);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .from_writer(Vec::new());

    writer.write_record(&headers)?;
    for row in rows {
        let record = headers
            .iter()
            .map(|header| match row.get(header) {
                Some(value) => cell_to_string(value),
                None => Ok(String::new()),
            })
            .collect::<Result<Vec<String>>>()?;
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().map_err(|e| ConvertError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ConvertError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: GenericValue) -> FlatRow {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let rows = vec![row(json!({"a": 1, "b/c": 2}))];
        let csv = rows_to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["a,b/c", "1,2"]);
    }

    #[test]
    fn test_header_union_in_discovery_order() {
        let rows = vec![
            row(json!({"id": 1, "name": "first"})),
            row(json!({"id": 2, "extra": true})),
            row(json!({"name": "third", "id": 3})),
        ];
        assert_eq!(collect_headers(&rows), vec!["id", "name", "extra"]);

        let csv = rows_to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,name,extra");
        assert_eq!(lines[1], "1,first,");
        assert_eq!(lines[2], "2,,true");
        assert_eq!(lines[3], "3,third,");
    }

    #[test]
    fn test_cell_rendering() {
        let rows = vec![row(json!({
            "null": null,
            "list": [1, 2, 3],
            "text": "has, comma",
            "quote": "say \"hi\""
        }))];
        let csv = rows_to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "null,list,text,quote");
        assert_eq!(lines[1], r#","[1,2,3]","has, comma","say ""hi""""#);
    }

    #[test]
    fn test_empty_rows_produce_empty_output() {
        assert_eq!(rows_to_csv(&[]).unwrap(), "");
    }
}
