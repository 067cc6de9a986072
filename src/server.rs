//! HTTP endpoints for the three conversions

use crate::config::cli::LocalStorage;
use crate::config::toml_config::TomlConfig;
use crate::core::converter::Converter;
use crate::core::Storage;
use crate::domain::model::{ConvertRequest, ErrorBody};
use crate::utils::error::{ConvertError, ErrorCategory, Result};
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug)]
struct InvalidBody(String);

impl warp::reject::Reject for InvalidBody {}

#[derive(Debug)]
struct BodyTooLarge;

impl warp::reject::Reject for BodyTooLarge {}

fn json_reply<T: Serialize>(body: &T, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

/// 將處理錯誤轉成 JSON 錯誤回應
fn error_reply(err: &ConvertError, summary: &str) -> warp::reply::WithStatus<warp::reply::Json> {
    tracing::error!("❌ {}: {}", summary, err);

    let body = match err.category() {
        ErrorCategory::Conversion => ErrorBody {
            error: summary.to_string(),
            details: Some(err.to_string()),
        },
        ErrorCategory::Validation | ErrorCategory::NotFound => ErrorBody {
            error: err.to_string(),
            details: None,
        },
    };
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_reply(&body, status)
}

async fn handle_xml_to_json<S: Storage + 'static>(
    request: ConvertRequest,
    converter: Arc<Converter<S>>,
) -> std::result::Result<impl Reply, Rejection> {
    Ok(match converter.xml_to_json(&request).await {
        Ok(response) => json_reply(&response, StatusCode::OK),
        Err(e) => error_reply(&e, "Error converting XML to JSON"),
    })
}

async fn handle_json_to_csv<S: Storage + 'static>(
    request: ConvertRequest,
    converter: Arc<Converter<S>>,
) -> std::result::Result<impl Reply, Rejection> {
    Ok(match converter.json_to_csv(&request).await {
        Ok(response) => json_reply(&response, StatusCode::OK),
        Err(e) => error_reply(&e, "Error converting JSON to CSV"),
    })
}

async fn handle_xml_to_csv<S: Storage + 'static>(
    request: ConvertRequest,
    converter: Arc<Converter<S>>,
) -> std::result::Result<impl Reply, Rejection> {
    Ok(match converter.xml_to_csv(&request).await {
        Ok(response) => json_reply(&response, StatusCode::OK),
        Err(e) => error_reply(&e, "Error converting XML to CSV"),
    })
}

/// 解析請求 body，空白或缺少時視為 `{}`
fn decode_request_body(body: &[u8]) -> std::result::Result<ConvertRequest, Rejection> {
    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(warp::reject::custom(BodyTooLarge));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ConvertRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| warp::reject::custom(InvalidBody(e.to_string())))
}

/// 讀取可選的 JSON body，宣告長度超過上限時直接拒絕
fn request_body() -> impl Filter<Extract = (ConvertRequest,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(|length: Option<u64>| async move {
            match length {
                Some(length) if length > MAX_BODY_BYTES => {
                    Err(warp::reject::custom(BodyTooLarge))
                }
                _ => Ok(()),
            }
        })
        .untuple_one()
        .and(warp::body::bytes())
        .and_then(|body: Bytes| async move { decode_request_body(&body) })
}

async fn handle_rejection(err: Rejection) -> std::result::Result<impl Reply, Infallible> {
    let (status, error) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Route not found".to_string())
    } else if let Some(InvalidBody(reason)) = err.find::<InvalidBody>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", reason))
    } else if err.find::<BodyTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
    } else if err.find::<warp::reject::InvalidHeader>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid request headers".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(json_reply(&ErrorBody { error, details: None }, status))
}

/// 組合所有路由
pub fn routes<S: Storage + 'static>(
    converter: Arc<Converter<S>>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let with_converter = warp::any().map(move || converter.clone());
    let json_body = request_body();

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "ok"})));

    let xml_to_json = warp::path!("convert" / "xml-to-json")
        .and(warp::post())
        .and(json_body.clone())
        .and(with_converter.clone())
        .and_then(handle_xml_to_json::<S>);

    let json_to_csv = warp::path!("convert" / "json-to-csv")
        .and(warp::post())
        .and(json_body.clone())
        .and(with_converter.clone())
        .and_then(handle_json_to_csv::<S>);

    let xml_to_csv = warp::path!("convert" / "xml-to-csv")
        .and(warp::post())
        .and(json_body)
        .and(with_converter)
        .and_then(handle_xml_to_csv::<S>);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["POST", "GET"]);

    health
        .or(xml_to_json)
        .or(json_to_csv)
        .or(xml_to_csv)
        .with(cors)
        .with(warp::trace::request())
        .recover(handle_rejection)
}

/// 建立目錄後啟動 HTTP 服務，收到 Ctrl-C 時結束
pub async fn start_http_server(config: &TomlConfig) -> Result<()> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| ConvertError::ConfigError {
            message: format!("Invalid bind address {}: {}", config.bind_address(), e),
        })?;

    let converter: Converter<LocalStorage> = Converter::from_config(config);
    converter.ensure_directories().await?;

    let (bound, server) = warp::serve(routes(Arc::new(converter)))
        .try_bind_with_graceful_shutdown(addr, async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("🛑 Shutdown signal received");
        })
        .map_err(|e| ConvertError::ConfigError {
            message: format!("Failed to bind {}: {}", addr, e),
        })?;

    tracing::info!("🚀 HTTP server listening on http://{}", bound);
    server.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_decodes_to_default_request() {
        let bodies: [&[u8]; 2] = [b"", b"  \n"];
        for body in bodies {
            let request = decode_request_body(body).unwrap();
            assert!(request.filename.is_none());
            assert!(request.json_path.is_none());
        }
    }

    #[test]
    fn test_body_fields_are_decoded() {
        let request =
            decode_request_body(br#"{"filename": "a.json", "jsonPath": "rows"}"#).unwrap();
        assert_eq!(request.filename.as_deref(), Some("a.json"));
        assert_eq!(request.json_path.as_deref(), Some("rows"));
    }

    #[test]
    fn test_bad_bodies_are_rejected() {
        let malformed = decode_request_body(b"{not json").unwrap_err();
        assert!(malformed.find::<InvalidBody>().is_some());

        let oversized = vec![b' '; MAX_BODY_BYTES as usize + 1];
        let rejection = decode_request_body(&oversized).unwrap_err();
        assert!(rejection.find::<BodyTooLarge>().is_some());
    }
}
