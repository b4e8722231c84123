use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("API error (status {status}): {}", .body.summary())]
    Api { status: u16, body: ApiFailureBody },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Structured failure body returned by the management API.
///
/// The service attaches a machine code (e.g. `streams-mgmt-36`) and a
/// human reason to 4xx responses. Both are optional: proxies and load
/// balancers produce bodies with neither, and those must still parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailureBody {
    /// Machine code identifying the failure
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable reason supplied by the service
    #[serde(default)]
    pub reason: Option<String>,
}

impl ApiFailureBody {
    /// Parse a raw response body, tolerating anything unparseable.
    ///
    /// A malformed body yields an empty `ApiFailureBody`, which the
    /// classifier maps to `Unknown` rather than failing.
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Short description for error display.
    pub fn summary(&self) -> String {
        match (&self.code, &self.reason) {
            (Some(code), Some(reason)) => format!("{}: {}", code, reason),
            (Some(code), None) => code.clone(),
            (None, Some(reason)) => reason.clone(),
            (None, None) => "no failure detail".to_string(),
        }
    }
}

impl Error {
    /// Build an API error from a status line and raw response body.
    pub fn api(status: u16, raw_body: &str) -> Self {
        Error::Api {
            status,
            body: ApiFailureBody::parse(raw_body),
        }
    }
}
