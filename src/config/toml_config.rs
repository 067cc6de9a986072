use crate::core::ConfigProvider;
use crate::domain::model::DEFAULT_XML_TO_CSV_PATH;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::Validate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub directories: DirectoryConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_xml_dir")]
    pub xml: String,
    #[serde(default = "default_json_dir")]
    pub json: String,
    #[serde(default = "default_csv_dir")]
    pub csv: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(default = "default_json_path")]
    pub default_json_path: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_xml_dir() -> String {
    "uploads/xml".to_string()
}

fn default_json_dir() -> String {
    "output/json".to_string()
}

fn default_csv_dir() -> String {
    "output/csv".to_string()
}

fn default_json_path() -> String {
    DEFAULT_XML_TO_CSV_PATH.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            xml: default_xml_dir(),
            json: default_json_dir(),
            csv: default_csv_dir(),
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            default_json_path: default_json_path(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConvertError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保留原文
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 服務監聽位址，例如 `127.0.0.1:3000`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("server.host", &self.server.host)?;
        if self.server.port == 0 {
            return Err(ConvertError::ConfigError {
                message: "server.port: port 0 is not allowed".to_string(),
            });
        }
        crate::utils::validation::validate_path("directories.xml", &self.directories.xml)?;
        crate::utils::validation::validate_path("directories.json", &self.directories.json)?;
        crate::utils::validation::validate_path("directories.csv", &self.directories.csv)?;
        crate::utils::validation::validate_non_empty_string(
            "conversion.default_json_path",
            &self.conversion.default_json_path,
        )?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn xml_dir(&self) -> &str {
        &self.directories.xml
    }

    fn json_dir(&self) -> &str {
        &self.directories.json
    }

    fn csv_dir(&self) -> &str {
        &self.directories.csv
    }

    fn default_json_path(&self) -> &str {
        &self.conversion.default_json_path
    }
}
