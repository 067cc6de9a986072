use crate::utils::error::Result;
use std::path::PathBuf;

/// 以目錄為根的檔案存取
pub trait Storage: Send + Sync {
    fn base_path(&self) -> &str;
    fn resolve(&self, path: &str) -> PathBuf;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn xml_dir(&self) -> &str;
    fn json_dir(&self) -> &str;
    fn csv_dir(&self) -> &str;
    fn default_json_path(&self) -> &str;
}
