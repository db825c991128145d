use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chatrelay_sdk::error::AssistantError;
use shared_types::ChatErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    /// The assistant API rejected a call or could not be reached
    #[error("{0}")]
    Service(#[from] AssistantError),

    #[error("Assistant run timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error(
        "Assistant run failed{}",
        .reason.as_ref().map(|r| format!(": {r}")).unwrap_or_default()
    )]
    RunFailed {
        run_id: String,
        reason: Option<String>,
    },

    /// Thread creation failed on the dedicated new-thread route
    #[error("Failed to create new thread")]
    ThreadCreation {
        #[source]
        source: AssistantError,
    },

    #[error("Assistant returned no text reply")]
    MissingReply { thread_id: String },

    #[error("Invalid request")]
    InvalidRequest,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ProxyError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ProxyError::Service(_) => "service_error",
            ProxyError::Timeout { .. } => "timeout",
            ProxyError::RunFailed { .. } => "run_failed",
            ProxyError::ThreadCreation { .. } => "thread_creation",
            ProxyError::MissingReply { .. } => "missing_reply",
            ProxyError::InvalidRequest => "invalid_request",
            ProxyError::MethodNotAllowed => "method_not_allowed",
        }
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest => StatusCode::BAD_REQUEST,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Service(_)
            | ProxyError::Timeout { .. }
            | ProxyError::RunFailed { .. }
            | ProxyError::ThreadCreation { .. }
            | ProxyError::MissingReply { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ProxyError::InvalidRequest | ProxyError::MethodNotAllowed => {
                ChatErrorResponse::rejected(self.to_string())
            }
            _ => ChatErrorResponse::failure(self.to_string()),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
