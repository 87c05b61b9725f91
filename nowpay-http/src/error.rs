//! Error types for the HTTP transport and configuration loading.

use http::StatusCode;
use serde::Deserialize;

/// Errors that can occur while dispatching a request over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum HttpDispatchError {
    /// The client configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// The API key is not a valid header value.
    #[error("API key is not a valid header value")]
    InvalidApiKey(#[source] http::header::InvalidHeaderValue),
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP transport error.
    #[error("HTTP error: {context}: {source}")]
    Http {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// Failed to read response body.
    #[error("Failed to read response body: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The API answered with its structured error object.
    #[error("{context}: {source}")]
    Api {
        /// Human-readable context.
        context: &'static str,
        /// The decoded API error.
        #[source]
        source: ApiError,
    },
    /// Unexpected HTTP status code with a body that is not an API error.
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// The response body.
        body: String,
    },
}

impl HttpDispatchError {
    /// Returns the HTTP status of a failed response, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { source, .. } => Some(source.status),
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The error object the API returns on failed requests.
///
/// ```json
/// { "status": false, "statusCode": 400, "code": "INVALID_REQUEST_PARAMS", "message": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API error {status} ({code}): {message}")]
pub struct ApiError {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Machine-readable error code (e.g. `"INVALID_API_KEY"`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

impl ApiError {
    /// Parses an API error object out of a failed response body.
    ///
    /// Returns `None` if `body` is not the API's error shape.
    #[must_use]
    pub fn from_body(status: StatusCode, body: &str) -> Option<Self> {
        let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
        Some(Self {
            status,
            code: parsed.code,
            message: parsed.message,
        })
    }
}

/// Errors that can occur while loading a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON of the expected shape.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path of the file.
        path: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// No API key was configured.
    #[error("missing API key (set apiKey or NOWPAYMENTS_API_KEY)")]
    MissingApiKey,
    /// The server URL is not a valid absolute URL.
    #[error("invalid server URL {url:?}: {source}")]
    InvalidServer {
        /// The rejected value.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// The timeout is not a positive number of seconds.
    #[error("invalid timeout {0:?}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_body() {
        let body = r#"{"status":false,"statusCode":403,"code":"INVALID_API_KEY","message":"Invalid api key"}"#;
        let err = ApiError::from_body(StatusCode::FORBIDDEN, body).unwrap();
        assert_eq!(err.code, "INVALID_API_KEY");
        assert_eq!(err.message, "Invalid api key");
        assert_eq!(
            err.to_string(),
            "API error 403 Forbidden (INVALID_API_KEY): Invalid api key"
        );
    }

    #[test]
    fn test_api_error_from_other_body() {
        assert!(ApiError::from_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").is_none());
        assert!(ApiError::from_body(StatusCode::BAD_REQUEST, r#"{"message":"x"}"#).is_none());
    }
}
