//! The extraction engine seam. The gateway only knows this trait; the engine
//! decides what the returned data looks like.

pub mod ytdlp;

use async_trait::async_trait;
use serde::Serialize;

use crate::models::ExtractionOptions;

pub use ytdlp::YtDlp;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0} is not installed")]
    NotInstalled(String),
    #[error("failed to run {tool}: {message}")]
    Spawn { tool: String, message: String },
    #[error("timed out after {0}s")]
    Timeout(u64),
    #[error("unreadable output: {0}")]
    Output(String),
    /// Whatever the engine reported for an unsuccessful extraction.
    #[error("{0}")]
    Failed(String),
}

#[async_trait]
pub trait Extractor: Send + Sync + 'static {
    type Output: Serialize + Send;

    async fn extract(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<Self::Output, EngineError>;
}
