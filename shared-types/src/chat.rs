use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Value of `action` that starts a fresh conversation
pub const NEW_THREAD_ACTION: &str = "new_thread";

/// Confirmation text returned when a conversation is (re)started
pub const NEW_THREAD_MESSAGE: &str = "New conversation started";

/// Body accepted by `POST /api/chat`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn new_thread() -> Self {
        Self {
            action: Some(NEW_THREAD_ACTION.to_string()),
            message: None,
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self {
            action: None,
            message: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewThreadResponse {
    pub success: bool,
    pub thread_id: String,
    pub message: String,
}

impl NewThreadResponse {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            success: true,
            thread_id: thread_id.into(),
            message: NEW_THREAD_MESSAGE.to_string(),
        }
    }
}

/// Assistant reply to a chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatReplyResponse {
    pub success: bool,
    pub message: String,
}

/// Error envelope. `success` is only present on failures that reached the assistant backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub success: Option<bool>,
    pub error: String,
}

impl ChatErrorResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: error.into(),
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: None,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[ts(type = "number")]
    pub uptime: u64,
    #[ts(type = "number")]
    pub sessions: usize,
}
