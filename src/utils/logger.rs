use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Compact,
    Json,
}

/// `RUST_LOG` 優先，否則使用預設的過濾規則
fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

fn init_subscriber(filter: EnvFilter, format: LogFormat) {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}

pub fn init_cli_logger(verbose: bool) {
    let directives = if verbose { "xmlconv=debug,info" } else { "xmlconv=info" };
    init_subscriber(env_filter(directives), LogFormat::Compact);
}

/// 以 JSON 格式輸出日誌，供容器化部署時的日誌收集使用
pub fn init_json_logger() {
    init_subscriber(env_filter("xmlconv=info"), LogFormat::Json);
}
