use std::sync::Arc;

use chatrelay_sdk::client::AssistantClient;
use chatrelay_sdk::types::{MessageRole, Run, RunStatus};
use shared_types::{ChatRequest, NEW_THREAD_ACTION};
use tracing::{debug, error, info, warn};

use crate::error::{ProxyError, ProxyResult};
use crate::polling::{PollOutcome, PollPolicy};
use crate::session::SessionStore;

/// What an inbound chat request asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyAction {
    NewThread,
    SendMessage(String),
}

impl ProxyAction {
    /// `action: "new_thread"` wins over `message`; blank messages are rejected
    pub fn from_request(request: ChatRequest) -> ProxyResult<Self> {
        if request.action.as_deref() == Some(NEW_THREAD_ACTION) {
            return Ok(ProxyAction::NewThread);
        }

        match request.message {
            Some(message) if !message.trim().is_empty() => Ok(ProxyAction::SendMessage(message)),
            _ => Err(ProxyError::InvalidRequest),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyReply {
    ThreadStarted { thread_id: String },
    AssistantMessage { text: String },
}

/// Relays chat turns to a hosted assistant, one thread per session
pub struct ConversationProxy {
    client: Arc<dyn AssistantClient>,
    assistant_id: String,
    poll_policy: PollPolicy,
    sessions: SessionStore,
}

impl ConversationProxy {
    pub fn new(
        client: Arc<dyn AssistantClient>,
        assistant_id: impl Into<String>,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            client,
            assistant_id: assistant_id.into(),
            poll_policy,
            sessions: SessionStore::new(),
        }
    }

    /// Track sessions in `sessions`, typically built from `[session]` limits
    pub fn with_session_store(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn dispatch(&self, session_id: &str, action: ProxyAction) -> ProxyResult<ProxyReply> {
        let result = match action {
            ProxyAction::NewThread => self
                .start_new_conversation(session_id)
                .await
                .map(|thread_id| ProxyReply::ThreadStarted { thread_id }),
            ProxyAction::SendMessage(message) => self
                .send_message(session_id, &message)
                .await
                .map(|text| ProxyReply::AssistantMessage { text }),
        };

        if let Err(e) = &result {
            error!(
                error = %e,
                kind = e.error_type(),
                session_id = %session_id,
                provider = self.client.provider_name(),
                "Chat request failed"
            );
        }

        result
    }

    /// Open a fresh thread and make it the session's current one
    pub async fn start_new_conversation(&self, session_id: &str) -> ProxyResult<String> {
        let thread = self.client.create_thread().await?;
        let previous = self
            .sessions
            .replace_thread(session_id, thread.id.clone())
            .await;

        info!(
            session_id = %session_id,
            thread_id = %thread.id,
            replaced = ?previous,
            "Started new conversation"
        );
        Ok(thread.id)
    }

    /// Post a user message, run the assistant and return its latest reply
    pub async fn send_message(&self, session_id: &str, message: &str) -> ProxyResult<String> {
        let thread_id = self.ensure_thread(session_id).await?;

        self.client
            .create_message(&thread_id, MessageRole::User, message)
            .await?;

        let run = self
            .client
            .create_run(&thread_id, &self.assistant_id)
            .await?;
        info!(
            session_id = %session_id,
            thread_id = %thread_id,
            run_id = %run.id,
            "Started assistant run"
        );

        self.wait_for_run(&thread_id, &run).await?;
        self.latest_reply(&thread_id).await
    }

    async fn ensure_thread(&self, session_id: &str) -> ProxyResult<String> {
        let (thread_id, created) = self
            .sessions
            .get_or_create_thread(session_id, || async {
                let thread = self.client.create_thread().await?;
                Ok::<_, ProxyError>(thread.id)
            })
            .await?;

        if created {
            info!(session_id = %session_id, thread_id = %thread_id, "Created thread for session");
        }
        Ok(thread_id)
    }

    async fn wait_for_run(&self, thread_id: &str, run: &Run) -> ProxyResult<Run> {
        let outcome = self
            .poll_policy
            .run(
                |attempt| async move {
                    let current = self.client.retrieve_run(thread_id, &run.id).await?;
                    debug!(
                        run_id = %current.id,
                        attempt,
                        status = %current.status,
                        "Polled run status"
                    );
                    Ok::<_, ProxyError>(current)
                },
                |current| current.status.is_terminal(),
            )
            .await?;

        match outcome {
            PollOutcome::Ready { value, attempts } if value.status == RunStatus::Failed => {
                let reason = value.last_error.as_ref().map(|e| e.message.clone());
                warn!(run_id = %value.id, attempts, reason = ?reason, "Assistant run failed");
                Err(ProxyError::RunFailed {
                    run_id: value.id,
                    reason,
                })
            }
            PollOutcome::Ready { value, attempts } => {
                debug!(run_id = %value.id, attempts, "Assistant run completed");
                Ok(value)
            }
            PollOutcome::Exhausted { last, attempts } => {
                warn!(
                    run_id = %last.id,
                    attempts,
                    status = %last.status,
                    "Assistant run did not finish in time"
                );
                Err(ProxyError::Timeout { attempts })
            }
        }
    }

    async fn latest_reply(&self, thread_id: &str) -> ProxyResult<String> {
        let messages = self.client.list_messages(thread_id).await?;

        messages
            .latest()
            .and_then(|message| message.first_text())
            .map(str::to_string)
            .ok_or_else(|| ProxyError::MissingReply {
                thread_id: thread_id.to_string(),
            })
    }
}
