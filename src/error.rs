use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use serde_json::Value as JsonValue;

use crate::models::chat::ErrorBody;

pub const API_KEY_NOT_CONFIGURED: &str = "API key is not configured";
pub const NO_ASSISTANT_RESPONSE: &str = "No response from assistant";

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    /// The caller sent a body we cannot relay.
    #[error("{0}")]
    InvalidInput(String),

    /// The upstream credential is missing from the process configuration.
    #[error("{}", API_KEY_NOT_CONFIGURED)]
    ConfigurationError,

    /// The provider answered with a non-success status.
    #[error("{message}")]
    UpstreamError {
        status: u16,
        message: String,
        details: Option<JsonValue>,
    },

    /// The provider could not be reached at all.
    #[error("{message}")]
    UpstreamUnavailable {
        message: String,
        timed_out: bool,
    },

    #[error("{}", NO_ASSISTANT_RESPONSE)]
    EmptyResponse,

    #[error("Too many requests, please slow down")]
    RateLimited,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::ConfigurationError => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::UpstreamError { status, .. } =>
                match StatusCode::from_u16(*status) {
                    Ok(code) if code.is_client_error() || code.is_server_error() => code,
                    _ => StatusCode::BAD_GATEWAY,
                }
            RelayError::UpstreamUnavailable { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            RelayError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            RelayError::EmptyResponse => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let details = match self {
            RelayError::UpstreamError { details, .. } => details.clone(),
            _ => None,
        };
        ErrorBody { error: self.to_string(), details }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
