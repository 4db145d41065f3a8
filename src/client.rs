//! API Client
//!
//! Transport to the remote plot service. Sends one request, parses one
//! response, and classifies failures. Retry policy belongs to the caller.

use crate::config::ServiceConfig;
use crate::error::{ApiError, GenerationError};
use crate::request::GenerationRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Renderable plot data returned by the service, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub data: Vec<Value>,
    pub layout: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Plot service client
#[async_trait]
pub trait PlotClient: Send + Sync {
    /// Send one generation request and return the parsed plot data
    async fn send(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError>;

    /// Endpoint this client talks to, for diagnostics
    fn endpoint(&self) -> &str;
}

const MAX_ERROR_DETAIL: usize = 512;

fn map_http_error(error: reqwest::Error) -> GenerationError {
    let status = error.status().map(|s| s.as_u16());
    let detail = if error.is_timeout() {
        format!("Request timeout: {}", error)
    } else if error.is_connect() {
        format!("Connection error: {}", error)
    } else {
        format!("HTTP error: {}", error)
    };
    GenerationError::Transport { status, detail }
}

fn truncate_detail(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_ERROR_DETAIL {
        trimmed.to_string()
    } else {
        let mut out: String = trimmed.chars().take(MAX_ERROR_DETAIL).collect();
        out.push_str("...");
        out
    }
}

/// Parse a success body into a [`GenerationResult`].
///
/// The body must be a JSON object with an array `data` and an object
/// `layout`; anything else is a protocol error.
pub fn parse_result(body: &str) -> Result<GenerationResult, GenerationError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GenerationError::Protocol(format!("Response is not valid JSON: {}", e)))?;
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(GenerationError::Protocol(format!(
                "Expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let data = match object.remove("data") {
        Some(Value::Array(traces)) => traces,
        Some(other) => {
            return Err(GenerationError::Protocol(format!(
                "Field `data` must be an array, got {}",
                json_kind(&other)
            )))
        }
        None => return Err(GenerationError::Protocol("Response is missing `data`".to_string())),
    };

    let layout = match object.remove("layout") {
        Some(Value::Object(layout)) => layout,
        Some(other) => {
            return Err(GenerationError::Protocol(format!(
                "Field `layout` must be an object, got {}",
                json_kind(&other)
            )))
        }
        None => {
            return Err(GenerationError::Protocol(
                "Response is missing `layout`".to_string(),
            ))
        }
    };

    let status = match object.remove("status") {
        Some(Value::String(status)) => Some(status),
        _ => None,
    };

    Ok(GenerationResult {
        data,
        layout,
        status,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// reqwest-backed client for `POST <base_url>/plots/data`
pub struct HttpPlotClient {
    client: Client,
    data_url: String,
}

impl HttpPlotClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder()
            .no_proxy()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::ClientError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            data_url: data_url(&config.base_url),
        })
    }
}

pub(crate) fn data_url(base_url: &str) -> String {
    format!("{}/plots/data", base_url.trim_end_matches('/'))
}

#[async_trait]
impl PlotClient for HttpPlotClient {
    async fn send(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError> {
        debug!(
            url = %self.data_url,
            plot_type = %request.plot_type(),
            n_grid = request.grid().n_grid(),
            "Sending plot request"
        );

        let response = self
            .client
            .post(&self.data_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "Plot service returned an error status");
            return Err(GenerationError::Transport {
                status: Some(status.as_u16()),
                detail: truncate_detail(&error_text),
            });
        }

        let body = response.text().await.map_err(map_http_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "Plot response received");
        parse_result(&body)
    }

    fn endpoint(&self) -> &str {
        &self.data_url
    }
}
