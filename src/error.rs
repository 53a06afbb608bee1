use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use serde_json::json;
use thiserror::Error;

/// Failures a chat request can end in. None of them are retried.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Rejected before any provider call was made.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Credential missing at startup or refused by the provider.
    #[error("Provider authentication failed: {0}")]
    ProviderAuth(String),

    #[error("Provider unavailable: {message}")]
    ProviderUnavailable {
        message: String,
        timed_out: bool,
    },

    /// The provider answered, but not with a usable completion. `message` is its body as-is.
    #[error("Provider rejected the request{}: {message}", http_suffix(.status))]
    ProviderRejected {
        status: Option<u16>,
        message: String,
    },
}

fn http_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChatError::ProviderAuth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ChatError::ProviderUnavailable { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            ChatError::ProviderUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ChatError::ProviderRejected { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ChatError::ProviderRejected {
                status: err.status().map(|s| s.as_u16()),
                message: format!("Malformed provider response: {}", err),
            };
        }
        ChatError::ProviderUnavailable {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
