use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to an upstream data provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{provider} {series} {status}")]
    Status {
        provider: &'static str,
        series: String,
        status: reqwest::StatusCode,
    },

    #[error("{provider} {series} request failed: {source}")]
    Transport {
        provider: &'static str,
        series: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} {series} returned an unreadable body: {source}")]
    Decode {
        provider: &'static str,
        series: String,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    pub fn provider(&self) -> &'static str {
        match self {
            UpstreamError::Status { provider, .. }
            | UpstreamError::Transport { provider, .. }
            | UpstreamError::Decode { provider, .. } => provider,
        }
    }
}

/// Errors a handler can hand back to axum. Every variant renders as `{ "error": "..." }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Config(msg) => tracing::error!("Configuration error: {}", msg),
            AppError::Upstream(err) => {
                tracing::error!(provider = err.provider(), "Upstream error: {}", err)
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}
