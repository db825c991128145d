use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use shared_types::{ChatReplyResponse, ChatRequest, NewThreadResponse};
use tracing::{error, info};

use crate::error::ProxyError;
use crate::handlers::{AppState, SessionContext};
use crate::proxy::{ProxyAction, ProxyReply};

/// `POST /api/chat`: start a conversation or send a message, depending on the body
pub async fn chat(
    data: web::Data<AppState>,
    session: SessionContext,
    body: web::Json<ChatRequest>,
) -> HttpResponse {
    let action = ProxyAction::from_request(body.into_inner());
    respond(&data, &session, action).await
}

/// `POST /api/new-thread`: always starts a new conversation
pub async fn new_thread(data: web::Data<AppState>, session: SessionContext) -> HttpResponse {
    let result = execute(&data, &session, Ok(ProxyAction::NewThread))
        .await
        .map_err(|e| match e {
            ProxyError::Service(source) => ProxyError::ThreadCreation { source },
            other => other,
        });
    render(&session, result)
}

pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    let err = ProxyError::MethodNotAllowed;
    error!(
        error = %err,
        kind = err.error_type(),
        method = %req.method(),
        path = %req.path(),
        "Chat request rejected"
    );
    err.error_response()
}

async fn respond(
    data: &AppState,
    session: &SessionContext,
    action: Result<ProxyAction, ProxyError>,
) -> HttpResponse {
    let result = execute(data, session, action).await;
    render(session, result)
}

async fn execute(
    data: &AppState,
    session: &SessionContext,
    action: Result<ProxyAction, ProxyError>,
) -> Result<ProxyReply, ProxyError> {
    match action {
        Ok(action) => {
            info!(
                session_id = %session.id,
                new_session = session.issued(),
                action = action_name(&action),
                "Handling chat request"
            );
            data.proxy.dispatch(&session.id, action).await
        }
        Err(e) => {
            error!(
                error = %e,
                kind = e.error_type(),
                session_id = %session.id,
                "Chat request rejected"
            );
            Err(e)
        }
    }
}

fn render(session: &SessionContext, result: Result<ProxyReply, ProxyError>) -> HttpResponse {
    let mut response = match result {
        Ok(ProxyReply::ThreadStarted { thread_id }) => {
            HttpResponse::Ok().json(NewThreadResponse::new(thread_id))
        }
        Ok(ProxyReply::AssistantMessage { text }) => HttpResponse::Ok().json(ChatReplyResponse {
            success: true,
            message: text,
        }),
        Err(e) => e.error_response(),
    };

    session.attach(&mut response);
    response
}

fn action_name(action: &ProxyAction) -> &'static str {
    match action {
        ProxyAction::NewThread => "new_thread",
        ProxyAction::SendMessage(_) => "send_message",
    }
}
