use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Errors that can occur while serving a chat request
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request body is not valid JSON
    #[error("invalid json body")]
    InvalidJson,

    /// An `openai/` model was requested but no API key is configured
    #[error("OPENAI_API_KEY missing")]
    MissingApiKey,

    /// Upstream provider could not be reached or returned an unusable answer
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    /// HTTP status code for this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::MissingApiKey => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, "request failed");
        }

        let body = serde_json::json!({ "error": self.client_message() });
        (self.status_code(), Json(body)).into_response()
    }
}
