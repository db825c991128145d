#![allow(dead_code)]

pub mod logging;

use actix_web::{test, web, App};
use chatrelay_api::config::{CorsConfig, SessionConfig};
use chatrelay_api::handlers::{self, AppState};
use chatrelay_api::helpers::cors::cors_headers;
use chatrelay_api::polling::PollPolicy;
use chatrelay_api::proxy::ConversationProxy;
use chatrelay_api::session::{SessionLimits, SessionStore};
use chatrelay_sdk::client::AssistantClient;
use chatrelay_sdk::error::AssistantError;
use chatrelay_sdk::types::{
    MessageContent, MessageList, MessageRole, Run, RunError, RunStatus, TextContent, Thread,
    ThreadMessage,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_ASSISTANT_ID: &str = "asst_test";
pub const DEFAULT_REPLY: &str = "Hello from the assistant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateThread,
    CreateMessage { thread_id: String, content: String },
    CreateRun { thread_id: String, assistant_id: String },
    RetrieveRun { thread_id: String, run_id: String },
    ListMessages { thread_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    CreateThread,
    CreateMessage,
    CreateRun,
    RetrieveRun,
    ListMessages,
}

/// Scripted assistant backend. `retrieve_run` pops statuses from the script
/// and falls back to `idle_status` once it is empty.
pub struct MockAssistantClient {
    run_statuses: Mutex<VecDeque<RunStatus>>,
    idle_status: RunStatus,
    reply: Option<String>,
    run_error: Option<String>,
    fail_on: Option<FailOn>,
    thread_delay: Duration,
    threads: AtomicUsize,
    runs: AtomicUsize,
    calls: Mutex<Vec<MockCall>>,
}

impl MockAssistantClient {
    pub fn new() -> Self {
        MockAssistantClient {
            run_statuses: Mutex::new(VecDeque::new()),
            idle_status: RunStatus::Completed,
            reply: Some(DEFAULT_REPLY.to_string()),
            run_error: None,
            fail_on: None,
            thread_delay: Duration::ZERO,
            threads: AtomicUsize::new(0),
            runs: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_run_statuses(self, statuses: Vec<RunStatus>) -> Self {
        *self.run_statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn with_idle_status(mut self, status: RunStatus) -> Self {
        self.idle_status = status;
        self
    }

    pub fn with_reply(mut self, reply: Option<&str>) -> Self {
        self.reply = reply.map(str::to_string);
        self
    }

    pub fn with_run_error(mut self, message: &str) -> Self {
        self.run_error = Some(message.to_string());
        self
    }

    pub fn failing_on(mut self, fail_on: FailOn) -> Self {
        self.fail_on = Some(fail_on);
        self
    }

    pub fn with_thread_delay(mut self, delay: Duration) -> Self {
        self.thread_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn threads_created(&self) -> usize {
        self.threads.load(Ordering::SeqCst)
    }

    pub fn status_checks(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockCall::RetrieveRun { .. }))
            .count()
    }

    pub fn messages_posted_to(&self, thread_id: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::CreateMessage { thread_id: t, content } if t == thread_id => Some(content),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, step: FailOn) -> Result<(), AssistantError> {
        if self.fail_on == Some(step) {
            Err(AssistantError::api_error(503, format!("{step:?} unavailable")))
        } else {
            Ok(())
        }
    }

    fn run(&self, id: String, thread_id: &str, status: RunStatus) -> Run {
        let last_error = match (status, &self.run_error) {
            (RunStatus::Failed, Some(message)) => Some(RunError {
                code: "server_error".to_string(),
                message: message.clone(),
            }),
            _ => None,
        };

        Run {
            id,
            thread_id: thread_id.to_string(),
            assistant_id: TEST_ASSISTANT_ID.to_string(),
            status,
            created_at: 0,
            last_error,
        }
    }
}

impl Default for MockAssistantClient {
    fn default() -> Self {
        Self::new()
    }
}

fn text_message(id: &str, thread_id: &str, role: MessageRole, text: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        thread_id: thread_id.to_string(),
        role,
        content: vec![MessageContent::Text {
            text: TextContent {
                value: text.to_string(),
                annotations: Vec::new(),
            },
        }],
        created_at: 0,
        assistant_id: None,
        run_id: None,
    }
}

#[async_trait::async_trait]
impl AssistantClient for MockAssistantClient {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        self.record(MockCall::CreateThread);
        self.check(FailOn::CreateThread)?;

        if !self.thread_delay.is_zero() {
            tokio::time::sleep(self.thread_delay).await;
        }

        let n = self.threads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Thread {
            id: format!("thread_{n}"),
            created_at: 0,
        })
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage, AssistantError> {
        self.record(MockCall::CreateMessage {
            thread_id: thread_id.to_string(),
            content: content.to_string(),
        });
        self.check(FailOn::CreateMessage)?;

        Ok(text_message("msg_user", thread_id, role, content))
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<Run, AssistantError> {
        self.record(MockCall::CreateRun {
            thread_id: thread_id.to_string(),
            assistant_id: assistant_id.to_string(),
        });
        self.check(FailOn::CreateRun)?;

        let n = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(self.run(format!("run_{n}"), thread_id, RunStatus::Queued))
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        self.record(MockCall::RetrieveRun {
            thread_id: thread_id.to_string(),
            run_id: run_id.to_string(),
        });
        self.check(FailOn::RetrieveRun)?;

        let status = self
            .run_statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.idle_status);
        Ok(self.run(run_id.to_string(), thread_id, status))
    }

    async fn list_messages(&self, thread_id: &str) -> Result<MessageList, AssistantError> {
        self.record(MockCall::ListMessages {
            thread_id: thread_id.to_string(),
        });
        self.check(FailOn::ListMessages)?;

        // Newest first; an absent reply leaves the thread empty
        let data = match &self.reply {
            Some(reply) => vec![
                text_message("msg_assistant", thread_id, MessageRole::Assistant, reply),
                text_message("msg_user", thread_id, MessageRole::User, "earlier"),
            ],
            None => Vec::new(),
        };

        Ok(MessageList {
            first_id: data.first().map(|m| m.id.clone()),
            last_id: data.last().map(|m| m.id.clone()),
            data,
            has_more: false,
        })
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

pub fn create_proxy(mock: &Arc<MockAssistantClient>, policy: PollPolicy) -> ConversationProxy {
    let client = mock.clone() as Arc<dyn AssistantClient>;
    ConversationProxy::new(client, TEST_ASSISTANT_ID, policy)
}

pub struct TestApp<S> {
    pub mock: Arc<MockAssistantClient>,
    pub state: web::Data<AppState>,
    pub app: S,
}

pub async fn setup_test_app(
    mock: MockAssistantClient,
    policy: PollPolicy,
) -> TestApp<
    impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
> {
    setup_test_app_with_sessions(mock, policy, SessionLimits::default()).await
}

pub async fn setup_test_app_with_sessions(
    mock: MockAssistantClient,
    policy: PollPolicy,
    limits: SessionLimits,
) -> TestApp<
    impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
> {
    let mock = Arc::new(mock);
    let proxy =
        create_proxy(&mock, policy).with_session_store(SessionStore::with_limits(limits));
    let state = web::Data::new(AppState::new(proxy));

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .app_data(web::Data::new(SessionConfig::default()))
            .wrap(cors_headers(&CorsConfig::default()))
            .configure(handlers::configure),
    )
    .await;

    TestApp { mock, state, app }
}
