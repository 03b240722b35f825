//! OpenAI-compatible error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error types matching OpenAI API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    ServerError,
    ServiceUnavailableError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::ServerError => write!(f, "server_error"),
            Self::ServiceUnavailableError => write!(f, "service_unavailable_error"),
        }
    }
}

/// OpenAI-compatible error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                },
            },
        }
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiErrorType::InvalidRequestError,
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorType::ServerError,
            message,
        )
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorType::ServiceUnavailableError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let code = err.kind();

        let api_error = match &err {
            DomainError::InvalidRequest { message } => Self::bad_request(message),
            DomainError::AllProvidersExhausted { .. } => Self::unavailable(err.to_string()),
            _ => Self::internal(err.to_string()),
        };

        api_error.with_code(code)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{ProviderError, ProviderErrorKind};

    #[test]
    fn test_invalid_request_conversion() {
        let api_err: ApiError = DomainError::invalid_request("Messages required").into();

        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            api_err.response.error.error_type,
            ApiErrorType::InvalidRequestError
        );
        assert_eq!(api_err.response.error.message, "Messages required");
        assert_eq!(
            api_err.response.error.code.as_deref(),
            Some("invalid_request")
        );
    }

    #[test]
    fn test_exhausted_conversion() {
        let api_err: ApiError = DomainError::exhausted(
            "complex",
            vec!["local: timeout".to_string(), "groq: HTTP 429".to_string()],
        )
        .into();

        assert_eq!(api_err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            api_err.response.error.code.as_deref(),
            Some("all_providers_exhausted")
        );
        assert!(api_err.response.error.message.contains("local: timeout"));
        assert!(api_err.response.error.message.contains("groq: HTTP 429"));
    }

    #[test]
    fn test_other_errors_are_server_errors() {
        let api_err: ApiError = DomainError::internal("boom").into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let api_err: ApiError =
            DomainError::from(ProviderError::new(ProviderErrorKind::Transport, "groq", "reset"))
                .into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.response.error.code.as_deref(), Some("provider_error"));
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unavailable("No available providers").with_code("all_providers_exhausted");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "service_unavailable_error");
        assert_eq!(json["error"]["code"], "all_providers_exhausted");
        assert_eq!(json["error"]["message"], "No available providers");
    }
}
