use serde::{Deserialize, Serialize};

/// 解析後的通用樹狀資料（null、bool、數字、字串、陣列、物件）
pub type GenericValue = serde_json::Value;

/// 攤平後的一列資料，鍵以 `/` 串接路徑
pub type FlatRow = serde_json::Map<String, GenericValue>;

/// XML 屬性在解析結果中的保留鍵
pub const ATTRIBUTE_MARKER: &str = "$";

/// XML 文字內容在含有屬性或子元素時的保留鍵
pub const TEXT_MARKER: &str = "_";

pub const DEFAULT_XML_TO_CSV_PATH: &str = "clearing.operation";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub filename: Option<String>,
    #[serde(rename = "jsonPath")]
    pub json_path: Option<String>,
}

impl ConvertRequest {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            json_path: None,
        }
    }

    pub fn with_json_path(mut self, json_path: impl Into<String>) -> Self {
        self.json_path = Some(json_path.into());
        self
    }

    /// 空字串視同未提供
    pub fn json_path(&self) -> Option<&str> {
        self.json_path.as_deref().filter(|path| !path.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmlToJsonResponse {
    pub message: String,
    #[serde(rename = "jsonFilePath")]
    pub json_file_path: String,
    pub data: GenericValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonToCsvResponse {
    pub message: String,
    #[serde(rename = "csvFilePath")]
    pub csv_file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmlToCsvResponse {
    pub message: String,
    pub data: GenericValue,
    #[serde(rename = "csvFilePath")]
    pub csv_file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
