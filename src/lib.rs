pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::converter::Converter;
pub use domain::model::{ConvertRequest, GenericValue};
pub use utils::error::{ConvertError, Result};
