use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::{
    error::AssistantError,
    openai::types::{OpenAICreateMessageRequest, OpenAICreateRunRequest, OpenAIErrorResponse},
    types::{MessageList, MessageRole, Run, Thread, ThreadMessage},
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the OpenAI Assistants v2 API (threads, messages and runs)
pub struct OpenAIAssistantsClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl OpenAIAssistantsClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, AssistantError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AssistantError::authentication("API key cannot be empty"));
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client: build_http_client(DEFAULT_TIMEOUT)?,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, AssistantError> {
        self.http_client = build_http_client(timeout)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> Result<HeaderMap, AssistantError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| AssistantError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));
        Ok(headers)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AssistantError> {
        let response = request
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| AssistantError::Network { source: e })?;

        let status = response.status();

        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| AssistantError::Network { source: e })?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            // Extract retry-after header before consuming the response
            let retry_after = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                response
                    .headers()
                    .get("retry-after")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
            } else {
                None
            };

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            Err(map_error_response(status, retry_after, error_text))
        }
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AssistantError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AssistantError::Network { source: e })
}

fn map_error_response(
    status: reqwest::StatusCode,
    retry_after: Option<u64>,
    error_text: String,
) -> AssistantError {
    let message = match serde_json::from_str::<OpenAIErrorResponse>(&error_text) {
        Ok(error_response) => error_response.error.message,
        Err(_) => error_text,
    };

    match status {
        reqwest::StatusCode::BAD_REQUEST => AssistantError::invalid_request(message),
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            AssistantError::authentication(message)
        }
        reqwest::StatusCode::PAYLOAD_TOO_LARGE => {
            AssistantError::invalid_request("Request too large")
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => AssistantError::rate_limit(message, retry_after),
        _ => AssistantError::api_error(status.as_u16(), message),
    }
}

#[async_trait]
impl crate::client::AssistantClient for OpenAIAssistantsClient {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        let url = format!("{}/v1/threads", self.base_url);
        tracing::debug!(url = %url, "Creating thread");

        self.send(self.http_client.post(&url).json(&serde_json::json!({})))
            .await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage, AssistantError> {
        let url = format!("{}/v1/threads/{}/messages", self.base_url, thread_id);
        tracing::debug!(thread_id = %thread_id, role = %role, "Creating message");

        let request = OpenAICreateMessageRequest {
            role,
            content: content.to_string(),
        };
        self.send(self.http_client.post(&url).json(&request)).await
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<Run, AssistantError> {
        let url = format!("{}/v1/threads/{}/runs", self.base_url, thread_id);
        tracing::debug!(thread_id = %thread_id, assistant_id = %assistant_id, "Creating run");

        let request = OpenAICreateRunRequest {
            assistant_id: assistant_id.to_string(),
        };
        self.send(self.http_client.post(&url).json(&request)).await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        let url = format!("{}/v1/threads/{}/runs/{}", self.base_url, thread_id, run_id);
        self.send(self.http_client.get(&url)).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<MessageList, AssistantError> {
        let url = format!("{}/v1/threads/{}/messages", self.base_url, thread_id);
        self.send(self.http_client.get(&url)).await
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
