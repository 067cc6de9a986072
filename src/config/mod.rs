pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "xmlconv")]
#[command(about = "Convert XML to JSON and JSON to CSV over HTTP or from the command line")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true)]
    pub xml_dir: Option<String>,

    #[arg(long, global = true)]
    pub json_dir: Option<String>,

    #[arg(long, global = true)]
    pub csv_dir: Option<String>,

    #[arg(long, global = true)]
    pub host: Option<String>,

    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the conversion endpoints over HTTP
    Serve,
    /// Convert an XML file from the XML directory into JSON
    XmlToJson { filename: String },
    /// Convert a JSON file from the JSON directory into CSV
    JsonToCsv {
        filename: String,
        #[arg(long)]
        json_path: Option<String>,
    },
    /// Convert an XML file straight into CSV
    XmlToCsv {
        filename: String,
        #[arg(long)]
        json_path: Option<String>,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定：命令列參數 > TOML 檔案 > 預設值
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(xml_dir) = &self.xml_dir {
            config.directories.xml = xml_dir.clone();
        }
        if let Some(json_dir) = &self.json_dir {
            config.directories.json = json_dir.clone();
        }
        if let Some(csv_dir) = &self.csv_dir {
            config.directories.csv = csv_dir.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(config)
    }
}
