//! Error types for boundary parsing. The engine itself never fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed update line: {0}")]
    Json(#[from] serde_json::Error),

    #[error("update line is not a JSON object")]
    NotAnObject,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("method not found: {0}")]
    UnknownMethod(String),

    #[error("missing param `{0}`")]
    MissingParam(&'static str),

    #[error("invalid params: {0}")]
    InvalidParams(#[from] serde_json::Error),
}

impl ProtocolError {
    /// JSON-RPC 2.0 error code for this error.
    pub fn code(&self) -> i64 {
        match self {
            Self::UnknownMethod(_) => -32601,
            Self::MissingParam(_) | Self::InvalidParams(_) => -32602,
        }
    }
}
