use crate::utils::error::{ConvertError, Result};
use std::path::{Component, Path};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ConvertError::ConfigError {
            message: format!("{}: path cannot be empty", field_name),
        });
    }

    if path.contains('\0') {
        return Err(ConvertError::ConfigError {
            message: format!("{}: path contains null bytes", field_name),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConvertError::ConfigError {
            message: format!("{}: value cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}

/// 取得請求中的檔名，缺少或空白時回傳驗證錯誤
pub fn validate_filename(value: Option<&str>) -> Result<&str> {
    let filename = match value {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(ConvertError::validation("Filename is required")),
    };

    // 只允許目錄內的單一檔名
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(filename),
        _ => Err(ConvertError::validation(format!(
            "Invalid filename: {}",
            filename
        ))),
    }
}
