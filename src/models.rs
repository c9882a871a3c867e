use serde::{Deserialize, Serialize};

/// JSON body accepted by `POST /`.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
}

/// Hints forwarded to the extraction engine. A `None` field means the caller
/// did not ask for anything and the engine picks its own default.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub format: Option<String>,
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Outbound body for every JSON response. Exactly one of `data` and
/// `message` is set.
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope<T> {
    pub status: EnvelopeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ResponseEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data: Some(data),
            message: None,
        }
    }
}

impl ResponseEnvelope<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }
}
