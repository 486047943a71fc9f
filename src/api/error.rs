use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode cache entry")]
    CacheEncode(#[source] Box<bincode::error::EncodeError>),

    #[error("Failed to delete cache '{0}'")]
    CacheDeletion(PathBuf, #[source] std::io::Error),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}{}", with_reason(.reason))]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        reason: Option<String>,
    },

    #[error("Request for {url} failed after {attempts} attempts")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<ApiError>,
    },
}

fn with_reason(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Whether the failure is worth retrying: transport errors without a response, and
    /// the gateway style 5xx statuses.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::NetworkRequest(_, e) => !e.is_builder() && e.status().is_none(),
            ApiError::HttpStatus { status, .. } => matches!(status.as_u16(), 500 | 502 | 504),
            _ => false,
        }
    }

    /// HTTP status of the failure, looking through retry exhaustion.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            ApiError::NetworkRequest(_, e) => e.status(),
            ApiError::RetriesExhausted { source, .. } => source.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use reqwest::StatusCode;

    fn status_error(status: StatusCode) -> ApiError {
        ApiError::HttpStatus {
            url: "http://localhost/v1/forecast".to_string(),
            status,
            reason: None,
        }
    }

    #[test]
    fn test_transient_statuses() {
        assert!(status_error(StatusCode::INTERNAL_SERVER_ERROR).is_transient());
        assert!(status_error(StatusCode::BAD_GATEWAY).is_transient());
        assert!(status_error(StatusCode::GATEWAY_TIMEOUT).is_transient());

        assert!(!status_error(StatusCode::BAD_REQUEST).is_transient());
        assert!(!status_error(StatusCode::NOT_FOUND).is_transient());
        assert!(!status_error(StatusCode::TOO_MANY_REQUESTS).is_transient());
    }

    #[test]
    fn test_status_through_exhaustion() {
        let error = ApiError::RetriesExhausted {
            url: "http://localhost".to_string(),
            attempts: 3,
            source: Box::new(status_error(StatusCode::BAD_GATEWAY)),
        };
        assert_eq!(error.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(!error.is_transient());
    }

    #[test]
    fn test_status_message_includes_reason() {
        let error = ApiError::HttpStatus {
            url: "http://localhost".to_string(),
            status: StatusCode::BAD_REQUEST,
            reason: Some("Latitude must be in range of -90 to 90°.".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "HTTP request failed for http://localhost with status 400 Bad Request: Latitude must be in range of -90 to 90°."
        );
    }
}
