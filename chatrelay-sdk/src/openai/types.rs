//! Request and error bodies for the OpenAI Assistants v2 API.
//!
//! Response objects (threads, messages, runs) are shared with other backends
//! and live in [`crate::types`].

use serde::{Deserialize, Serialize};

use crate::types::MessageRole;

/// Body of `POST /v1/threads/{thread_id}/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAICreateMessageRequest {
    pub role: MessageRole,
    pub content: String,
}

/// Body of `POST /v1/threads/{thread_id}/runs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAICreateRunRequest {
    pub assistant_id: String,
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIErrorResponse {
    pub error: OpenAIError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub param: Option<String>,
    pub code: Option<String>,
}
