use crate::{
    error::AssistantError,
    types::{MessageList, MessageRole, Run, Thread, ThreadMessage},
};
use async_trait::async_trait;

/// Core trait for assistant conversation backends
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Create an empty thread
    async fn create_thread(&self) -> Result<Thread, AssistantError>;

    /// Append a message to a thread
    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage, AssistantError>;

    /// Start a run of the given assistant against a thread
    async fn create_run(&self, thread_id: &str, assistant_id: &str)
        -> Result<Run, AssistantError>;

    /// Fetch the current state of a run
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError>;

    /// List the messages on a thread (newest first)
    async fn list_messages(&self, thread_id: &str) -> Result<MessageList, AssistantError>;

    /// Get provider name (e.g., "openai")
    fn provider_name(&self) -> &str;
}
