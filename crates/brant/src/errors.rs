use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures the engine reports to callers. Classification misses are not
/// errors; a message that fails to classify simply stays plain text.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum RenderError {
    #[error("Stream already complete: {0}")]
    StreamComplete(String),

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Unsupported content: {0}")]
    UnsupportedContent(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
