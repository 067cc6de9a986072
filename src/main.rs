use clap::Parser;
use serde::Serialize;
use xmlconv::config::toml_config::TomlConfig;
use xmlconv::config::Command;
use xmlconv::utils::error::ErrorCategory;
use xmlconv::utils::{logger, validation::Validate};
use xmlconv::{CliConfig, ConvertError, ConvertRequest, Converter, LocalStorage};

fn print_response<T: Serialize>(response: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

fn exit_code(error: &ConvertError) -> i32 {
    match error.category() {
        ErrorCategory::Validation => 1,
        ErrorCategory::NotFound => 2,
        ErrorCategory::Conversion => 3,
    }
}

async fn prepare_converter(config: &TomlConfig) -> anyhow::Result<Converter<LocalStorage>> {
    let converter = Converter::from_config(config);
    converter.ensure_directories().await?;
    Ok(converter)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(exit_code(&e));
        }
    };

    let outcome = match &cli.command {
        // 服務模式由 start_http_server 建立目錄
        Command::Serve => {
            xmlconv::server::start_http_server(&config).await?;
            return Ok(());
        }
        Command::XmlToJson { filename } => prepare_converter(&config)
            .await?
            .xml_to_json(&ConvertRequest::new(filename.as_str()))
            .await
            .map(|response| print_response(&response)),
        Command::JsonToCsv { filename, json_path } => {
            let mut request = ConvertRequest::new(filename.as_str());
            request.json_path = json_path.clone();
            prepare_converter(&config)
                .await?
                .json_to_csv(&request)
                .await
                .map(|response| print_response(&response))
        }
        Command::XmlToCsv { filename, json_path } => {
            let mut request = ConvertRequest::new(filename.as_str());
            request.json_path = json_path.clone();
            prepare_converter(&config)
                .await?
                .xml_to_csv(&request)
                .await
                .map(|response| print_response(&response))
        }
    };

    match outcome {
        Ok(printed) => printed,
        Err(e) => {
            tracing::error!("❌ Conversion failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e);
            std::process::exit(exit_code(&e));
        }
    }
}
