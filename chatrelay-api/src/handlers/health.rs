use actix_web::{web, HttpResponse};
use shared_types::HealthResponse;

use crate::handlers::AppState;

pub async fn health_check(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: data.start_time.elapsed().as_secs(),
        sessions: data.proxy.sessions().len().await,
    })
}
