//! JSON-RPC request model shared by the daemon and its clients.

use serde_json::{Value, json};

use crate::error::ProtocolError;
use crate::types::RawNotification;

pub const METHOD_ENQUEUE: &str = "enqueue";
pub const METHOD_DISMISS: &str = "dismiss";
pub const METHOD_CLEAR_STALE: &str = "clear_stale";
pub const METHOD_CHANGE_CONTEXT: &str = "change_context";
pub const METHOD_SET_CONTEXT: &str = "set_context";
pub const METHOD_CURRENT: &str = "current";
pub const METHOD_STATUS: &str = "status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Enqueue(RawNotification),
    Dismiss,
    /// Prune against an explicit scene without touching the tracker.
    ClearStale { context_hash: String },
    /// Set the tracker, then prune.
    ChangeContext { context_hash: String },
    /// Set the tracker only.
    SetContext { context_hash: String },
    Current,
    Status,
}

impl Request {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Enqueue(_) => METHOD_ENQUEUE,
            Self::Dismiss => METHOD_DISMISS,
            Self::ClearStale { .. } => METHOD_CLEAR_STALE,
            Self::ChangeContext { .. } => METHOD_CHANGE_CONTEXT,
            Self::SetContext { .. } => METHOD_SET_CONTEXT,
            Self::Current => METHOD_CURRENT,
            Self::Status => METHOD_STATUS,
        }
    }

    /// Whether handling this request may change engine state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Current | Self::Status)
    }

    pub fn params(&self) -> Value {
        match self {
            Self::Enqueue(raw) => json!({ "notification": raw }),
            Self::ClearStale { context_hash }
            | Self::ChangeContext { context_hash }
            | Self::SetContext { context_hash } => json!({ "context_hash": context_hash }),
            Self::Dismiss | Self::Current | Self::Status => json!({}),
        }
    }

    pub fn parse(method: &str, params: &Value) -> Result<Self, ProtocolError> {
        match method {
            METHOD_ENQUEUE => {
                let notification = params
                    .get("notification")
                    .ok_or(ProtocolError::MissingParam("notification"))?;
                let raw: RawNotification = serde_json::from_value(notification.clone())?;
                Ok(Self::Enqueue(raw))
            }
            METHOD_DISMISS => Ok(Self::Dismiss),
            METHOD_CLEAR_STALE => Ok(Self::ClearStale {
                context_hash: context_param(params)?,
            }),
            METHOD_CHANGE_CONTEXT => Ok(Self::ChangeContext {
                context_hash: context_param(params)?,
            }),
            METHOD_SET_CONTEXT => Ok(Self::SetContext {
                context_hash: context_param(params)?,
            }),
            METHOD_CURRENT => Ok(Self::Current),
            METHOD_STATUS => Ok(Self::Status),
            other => Err(ProtocolError::UnknownMethod(other.to_owned())),
        }
    }
}

fn context_param(params: &Value) -> Result<String, ProtocolError> {
    params["context_hash"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or(ProtocolError::MissingParam("context_hash"))
}
