use std::future::{ready, Ready};

use actix_web::{
    cookie::Cookie, dev::Payload, web, FromRequest, HttpRequest, HttpResponse,
};
use tracing::warn;
use uuid::Uuid;

use crate::config::SessionConfig;

/// Session identity for one request.
///
/// Resolved from the session header, then the session cookie. When neither is
/// present a new id is issued and sent back as a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub id: String,
    cookie_name: String,
    issued: bool,
}

impl SessionContext {
    pub fn resolve(req: &HttpRequest, settings: &SessionConfig) -> Self {
        let from_header = req
            .headers()
            .get(settings.header_name.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let existing = from_header.or_else(|| {
            req.cookie(&settings.cookie_name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        });

        match existing {
            Some(id) => Self {
                id,
                cookie_name: settings.cookie_name.clone(),
                issued: false,
            },
            None => Self {
                id: Uuid::new_v4().to_string(),
                cookie_name: settings.cookie_name.clone(),
                issued: true,
            },
        }
    }

    pub fn issued(&self) -> bool {
        self.issued
    }

    /// Add the session cookie to `response` if this request was given a new id
    pub fn attach(&self, response: &mut HttpResponse) {
        if !self.issued {
            return;
        }

        let cookie = Cookie::build(self.cookie_name.clone(), self.id.clone())
            .path("/")
            .http_only(true)
            .finish();

        if let Err(e) = response.add_cookie(&cookie) {
            warn!(error = %e, "Failed to set session cookie");
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let context = match req.app_data::<web::Data<SessionConfig>>() {
            Some(settings) => SessionContext::resolve(req, settings),
            None => SessionContext::resolve(req, &SessionConfig::default()),
        };
        ready(Ok(context))
    }
}
