//! Failure taxonomy for Cyolo operations

use thiserror::Error;

/// Result type for every connector operation.
pub type Result<T> = std::result::Result<T, CyoloError>;

/// The single failure type surfaced to callers.
#[derive(Error, Debug)]
pub enum CyoloError {
    #[error("An SSL error occurred")]
    Tls,

    #[error("A connection error occurred")]
    Connection,

    #[error("The request timed out")]
    Timeout,

    #[error("There was an error while handling the request")]
    Request,

    /// Non-2xx response from the service.
    #[error("{}", api_message(.status, .reason, .detail))]
    Api {
        status: u16,
        reason: String,
        detail: Option<String>,
    },

    #[error("Invalid Policy ID: {0}")]
    PolicyNotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

fn api_message(status: &u16, reason: &str, detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!("Response [{status}:{reason} Details: {d}]"),
        None => format!("Response [{status}:{reason}]"),
    }
}

impl CyoloError {
    /// Classify a transport-level failure.
    ///
    /// TLS problems surface from reqwest as connect errors, so the source
    /// chain is inspected for them first. The top-level message is skipped
    /// since it embeds the request url.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if std::error::Error::source(err).map_or(false, is_tls_failure) {
            CyoloError::Tls
        } else if err.is_timeout() {
            CyoloError::Timeout
        } else if err.is_connect() {
            CyoloError::Connection
        } else if err.is_request() || err.is_body() || err.is_redirect() || err.is_builder() {
            CyoloError::Request
        } else {
            CyoloError::Other(err.to_string())
        }
    }
}

fn is_tls_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let msg = e.to_string().to_lowercase();
        if msg.contains("certificate") || msg.contains("tls") || msg.contains("ssl") {
            return true;
        }
        current = e.source();
    }
    false
}

impl From<serde_json::Error> for CyoloError {
    fn from(e: serde_json::Error) -> Self {
        CyoloError::Other(e.to_string())
    }
}
