use thiserror::Error;

/// Errors returned by assistant API clients
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Authentication failed (HTTP 401/403)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Invalid request parameters (HTTP 400/413)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// API error with status code (HTTP 4xx/5xx except above)
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network or connection error
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// JSON parsing or serialization error
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

impl AssistantError {
    /// Create an authentication error
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit<S: Into<String>>(message: S, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Create an invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an API error
    pub fn api_error<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_status_and_message() {
        let err = AssistantError::api_error(503, "upstream overloaded");
        assert_eq!(
            err.to_string(),
            "API error (status 503): upstream overloaded"
        );
    }

    #[test]
    fn test_rate_limit_keeps_retry_after() {
        match AssistantError::rate_limit("slow down", Some(7)) {
            AssistantError::RateLimit { retry_after, .. } => assert_eq!(retry_after, Some(7)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_from_serde() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AssistantError = source.into();
        assert!(matches!(err, AssistantError::Parse { .. }));
        assert!(err.to_string().starts_with("Parse error:"));
    }
}
