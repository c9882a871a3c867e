use std::sync::Arc;

use axum::{
    extract::{RawQuery, Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::{json_response, ApiError};
use crate::extract::Extractor;
use crate::models::ResponseEnvelope;
use crate::request;
use crate::validate::{self, ValidatedRequest};

/// Single entry point for `/`: decode, validate, run the engine once, respond.
pub async fn extract_endpoint<E: Extractor>(
    State(engine): State<Arc<E>>,
    method: Method,
    RawQuery(query): RawQuery,
    req: Request,
) -> Response {
    let decoded = match request::read_body(&method, req.into_body()).await {
        Ok(body) => request::decode(&method, query.as_deref(), &body),
        Err(e) => Err(e),
    };
    let incoming = match decoded {
        Ok(incoming) => incoming,
        Err(e) => {
            tracing::debug!(%method, error = %e, "rejected request");
            return e.into_response();
        }
    };

    let transport = incoming.transport;
    let validated = match validate::validate(incoming) {
        Ok(validated) => validated,
        Err(e) => {
            tracing::debug!(?transport, error = %e, "rejected request");
            return e.into_response();
        }
    };

    match dispatch(engine.as_ref(), &validated).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn dispatch<E: Extractor>(engine: &E, req: &ValidatedRequest) -> Result<Response, ApiError> {
    let data = engine.extract(&req.url, &req.options).await.map_err(|e| {
        tracing::warn!(transport = ?req.transport, url = %req.url, error = %e, "extraction failed");
        ApiError::EngineFailure(e.to_string())
    })?;

    tracing::info!(
        transport = ?req.transport,
        url = %req.url,
        format = req.options.format.as_deref(),
        quality = req.options.quality.as_deref(),
        "extracted"
    );
    Ok(respond(&ResponseEnvelope::success(data)))
}

/// Encodes the whole envelope before anything is written, so a failure here
/// can still turn into a clean plain-text 500.
fn respond<T: serde::Serialize>(envelope: &ResponseEnvelope<T>) -> Response {
    match serde_json::to_vec(envelope) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response");
            ApiError::EncodingFailure.into_response()
        }
    }
}
