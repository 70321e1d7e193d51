//! Error types and result handling.
//!
//! All fallible operations in this crate return [`Result`]. The taxonomy
//! mirrors the layers of the crate:
//!
//! - [`HttpError::Transport`] - the request could not be sent or received
//! - [`HttpError::Status`] - the server answered with status >= 400
//! - [`HttpError::Decode`] / [`HttpError::Encode`] - JSON body conversion failed
//! - [`HttpError::Handler`] / [`HttpError::HandlerPanic`] - the stream segment
//!   handler aborted or panicked
//!
//! Proxy misconfiguration is deliberately absent from this taxonomy: the
//! transport factory degrades to a direct connection and logs a warning
//! instead of failing the caller (see [`crate::client::TransportSelection`]).

use thiserror::Error;

/// Boxed error type accepted from caller-supplied segment handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, HttpError>;

/// Errors surfaced by request execution and event streaming.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be sent, or the response body could not be read.
    /// Covers DNS, connect, proxy dial, TLS and timeout failures.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request could not be constructed (bad URI, header name or value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The server answered with a status >= 400. When the error body parsed
    /// as JSON, `detail` carries a pretty-printed rendering of it.
    #[error("request failed with status: {status_line}{}", render_detail(.detail))]
    Status {
        /// Status line, e.g. `404 Not Found`.
        status_line: String,
        /// Pretty-printed JSON error body, when the server sent one.
        detail: Option<String>,
    },

    /// The response body was not valid JSON for the requested shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body value could not be JSON-encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The segment handler returned an error; the stream was stopped.
    #[error("segment handler aborted the stream: {0}")]
    Handler(#[source] BoxError),

    /// The segment handler panicked; the panic was caught at the streaming
    /// boundary and the stream was stopped.
    #[error("segment handler panicked: {0}")]
    HandlerPanic(String),
}

impl HttpError {
    /// Build a [`HttpError::Status`] from a status line and an optional raw
    /// error body. The body is embedded only when it parses as a JSON object,
    /// pretty-printed with a two-space indent.
    pub(crate) fn from_status(status_line: String, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(body)
            .ok()
            .map(|form| pretty_json(&serde_json::Value::Object(form)));
        HttpError::Status {
            status_line,
            detail,
        }
    }

    /// True when this error came from the transport layer rather than the
    /// server or the caller.
    pub fn is_transport(&self) -> bool {
        matches!(self, HttpError::Transport(_))
    }

    /// The numeric status code for [`HttpError::Status`], if parseable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HttpError::Status { status_line, .. } => {
                status_line.split_whitespace().next()?.parse().ok()
            }
            _ => None,
        }
    }
}

fn render_detail(detail: &Option<String>) -> String {
    match detail {
        Some(body) => format!("\n```json\n{}\n```", body),
        None => String::new(),
    }
}

/// Render a JSON value with a two-space indent.
pub(crate) fn pretty_json(value: &serde_json::Value) -> String {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    if serde::Serialize::serialize(value, &mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8_lossy(&out).into_owned()
}
