use crate::config::cli::LocalStorage;
use crate::core::clean::clean;
use crate::core::flatten::flatten;
use crate::core::select::select;
use crate::core::tabular::rows_to_csv;
use crate::core::xml::parse_xml;
use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{
    ConvertRequest, FlatRow, GenericValue, JsonToCsvResponse, XmlToCsvResponse, XmlToJsonResponse,
};
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::validate_filename;
use std::path::Path;

/// 三種轉換流程：XML→JSON、JSON→CSV、XML→CSV
///
/// 每個目錄各自對應一個 [`Storage`]，輸入檔從 XML / JSON 目錄讀取，
/// 結果寫入 JSON / CSV 目錄，檔名沿用輸入檔的主檔名。
pub struct Converter<S: Storage> {
    xml_storage: S,
    json_storage: S,
    csv_storage: S,
    default_json_path: String,
}

impl Converter<LocalStorage> {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            LocalStorage::new(config.xml_dir()),
            LocalStorage::new(config.json_dir()),
            LocalStorage::new(config.csv_dir()),
            config.default_json_path(),
        )
    }

    /// 建立輸入與輸出目錄
    pub async fn ensure_directories(&self) -> Result<()> {
        for storage in [&self.xml_storage, &self.json_storage, &self.csv_storage] {
            storage.ensure_dir().await?;
            tracing::debug!("📁 Directory ready: {}", storage.base_path());
        }
        Ok(())
    }
}

impl<S: Storage> Converter<S> {
    pub fn new(xml_storage: S, json_storage: S, csv_storage: S, default_json_path: &str) -> Self {
        Self {
            xml_storage,
            json_storage,
            csv_storage,
            default_json_path: default_json_path.to_string(),
        }
    }

    pub async fn xml_to_json(&self, request: &ConvertRequest) -> Result<XmlToJsonResponse> {
        let filename = validate_filename(request.filename.as_deref())?;
        tracing::info!("🔄 XML → JSON: {}", filename);

        let cleaned = self.load_cleaned_xml(filename).await?;

        let output_name = output_file_name(filename, "json");
        let json_text = serde_json::to_string_pretty(&cleaned)?;
        self.json_storage
            .write_file(&output_name, json_text.as_bytes())
            .await?;

        let json_file_path = self.json_storage.resolve(&output_name).display().to_string();
        tracing::info!("✅ JSON saved to: {}", json_file_path);

        Ok(XmlToJsonResponse {
            message: "XML converted to JSON successfully".to_string(),
            json_file_path,
            data: cleaned,
        })
    }

    pub async fn json_to_csv(&self, request: &ConvertRequest) -> Result<JsonToCsvResponse> {
        let filename = validate_filename(request.filename.as_deref())?;
        tracing::info!("🔄 JSON → CSV: {} (path: {:?})", filename, request.json_path());

        if !self.json_storage.exists(filename).await {
            return Err(ConvertError::not_found(
                self.json_storage.resolve(filename).display().to_string(),
            ));
        }

        let raw = self.json_storage.read_file(filename).await?;
        let value: GenericValue = serde_json::from_slice(&raw)?;

        let csv_text = value_to_csv(&value, request.json_path())?;
        let csv_file_path = self.write_csv(filename, &csv_text).await?;

        Ok(JsonToCsvResponse {
            message: "JSON converted to CSV successfully".to_string(),
            csv_file_path,
        })
    }

    pub async fn xml_to_csv(&self, request: &ConvertRequest) -> Result<XmlToCsvResponse> {
        let filename = validate_filename(request.filename.as_deref())?;
        let json_path = request.json_path().unwrap_or(&self.default_json_path);
        tracing::info!("🔄 XML → CSV: {} (path: {})", filename, json_path);

        let cleaned = self.load_cleaned_xml(filename).await?;
        let csv_text = value_to_csv(&cleaned, Some(json_path))?;
        let csv_file_path = self.write_csv(filename, &csv_text).await?;

        Ok(XmlToCsvResponse {
            message: "XML converted to CSV successfully".to_string(),
            data: cleaned,
            csv_file_path,
        })
    }

    /// 讀取 XML 檔、解析並整理成巢狀 JSON
    async fn load_cleaned_xml(&self, filename: &str) -> Result<GenericValue> {
        if !self.xml_storage.exists(filename).await {
            return Err(ConvertError::not_found(
                self.xml_storage.resolve(filename).display().to_string(),
            ));
        }

        let raw = self.xml_storage.read_file(filename).await?;
        let text = String::from_utf8(raw).map_err(|e| ConvertError::XmlError {
            message: format!("Input is not valid UTF-8: {}", e),
        })?;

        let parsed = tokio::task::spawn_blocking(move || parse_xml(&text))
            .await
            .map_err(|e| ConvertError::XmlError {
                message: format!("XML parser task failed: {}", e),
            })??;
        tracing::debug!("Parsed XML file {}", filename);

        Ok(clean(parsed))
    }

    async fn write_csv(&self, filename: &str, csv_text: &str) -> Result<String> {
        let output_name = output_file_name(filename, "csv");
        self.csv_storage
            .write_file(&output_name, csv_text.as_bytes())
            .await?;

        let csv_file_path = self.csv_storage.resolve(&output_name).display().to_string();
        tracing::info!("✅ CSV saved to: {}", csv_file_path);
        Ok(csv_file_path)
    }
}

/// 依路徑取出陣列、逐筆攤平後輸出 CSV
pub fn value_to_csv(value: &GenericValue, json_path: Option<&str>) -> Result<String> {
    let selected = match json_path {
        Some(path) => select(value, path).ok_or_else(|| {
            ConvertError::validation(format!("JSON path '{}' not found in the data", path))
        })?,
        None => value,
    };

    let items = selected.as_array().ok_or_else(|| {
        ConvertError::validation("The selected JSON data is not an array, cannot convert to CSV")
    })?;

    let rows = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object().map(|obj| flatten(obj, "")).ok_or_else(|| {
                ConvertError::validation(format!(
                    "Element {} of the selected array is not an object",
                    index
                ))
            })
        })
        .collect::<Result<Vec<FlatRow>>>()?;
    tracing::debug!("Flattened {} rows", rows.len());

    rows_to_csv(&rows)
}

fn output_file_name(filename: &str, extension: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename);
    format!("{}.{}", stem, extension)
}
