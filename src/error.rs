use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::models::ResponseEnvelope;

pub const ENCODE_FAILURE_BODY: &str = "Failed to encode response";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Invalid JSON body")]
    MalformedInput,
    #[error("{0}")]
    ValidationFailed(&'static str),
    #[error("Failed to extract data: {0}")]
    EngineFailure(String),
    #[error("Failed to encode response")]
    EncodingFailure,
}

impl ApiError {
    pub const MISSING_URL: Self = ApiError::ValidationFailed("URL parameter is missing");
    pub const INVALID_URL: Self = ApiError::ValidationFailed("Invalid URL provided");

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MalformedInput | ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::EngineFailure(_) | ApiError::EncodingFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::EncodingFailure = self {
            return encode_failure();
        }

        let envelope = ResponseEnvelope::error(self.to_string());
        let mut response = match serde_json::to_vec(&envelope) {
            Ok(body) => json_response(status, body),
            Err(_) => return encode_failure(),
        };
        if let ApiError::MethodNotAllowed = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, POST"));
        }
        response
    }
}

/// Builds a response with the JSON content type and status fixed before the
/// body is attached.
pub fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Terminal fallback when the envelope itself cannot be serialized. No second
/// encode is attempted.
fn encode_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ENCODE_FAILURE_BODY,
    )
        .into_response()
}
