use actix_web::middleware::DefaultHeaders;

use crate::config::CorsConfig;

/// Static CORS headers added to every response, including errors and preflights
pub fn cors_headers(cors: &CorsConfig) -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Credentials", "true"))
        .add(("Access-Control-Allow-Origin", cors.allow_origin.clone()))
        .add(("Access-Control-Allow-Methods", cors.allow_methods.clone()))
        .add(("Access-Control-Allow-Headers", cors.allow_headers.clone()))
}
