use url::Url;

use crate::error::ApiError;
use crate::models::ExtractionOptions;
use crate::request::{IncomingRequest, Transport};

/// A request that passed validation and is ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub transport: Transport,
    pub url: String,
    pub options: ExtractionOptions,
}

pub fn validate(req: IncomingRequest) -> Result<ValidatedRequest, ApiError> {
    let url = req.raw_url.trim();
    if url.is_empty() {
        return Err(ApiError::MISSING_URL);
    }
    // Syntax only: any scheme the parser accepts is fine, nothing is resolved.
    Url::parse(url).map_err(|_| ApiError::INVALID_URL)?;

    Ok(ValidatedRequest {
        transport: req.transport,
        url: url.to_string(),
        options: ExtractionOptions {
            format: req.format.filter(|hint| !hint.is_empty()),
            quality: req.quality.filter(|hint| !hint.is_empty()),
        },
    })
}
