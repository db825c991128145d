pub mod chat;
pub mod health;
pub mod session_context;

use std::time::Instant;

use actix_web::{error::InternalError, http::Method, web, HttpResponse};
use shared_types::ChatErrorResponse;

use crate::error::ProxyError;
use crate::proxy::ConversationProxy;

pub use session_context::SessionContext;

pub struct AppState {
    pub proxy: ConversationProxy,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(proxy: ConversationProxy) -> Self {
        Self {
            proxy,
            start_time: Instant::now(),
        }
    }
}

/// Register every route on an app or scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(|err, req| {
                tracing::error!(
                    error = %err,
                    kind = ProxyError::InvalidRequest.error_type(),
                    path = %req.path(),
                    "Rejected malformed chat body"
                );
                InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(ChatErrorResponse::rejected(
                        ProxyError::InvalidRequest.to_string(),
                    )),
                )
                .into()
            }),
    )
    .service(
        web::resource("/api/chat")
            .route(web::post().to(chat::chat))
            .route(web::method(Method::OPTIONS).to(chat::preflight))
            .default_service(web::to(chat::method_not_allowed)),
    )
    .service(
        web::resource("/api/new-thread")
            .route(web::post().to(chat::new_thread))
            .route(web::method(Method::OPTIONS).to(chat::preflight))
            .default_service(web::to(chat::method_not_allowed)),
    )
    .route("/api/health", web::get().to(health::health_check));
}
