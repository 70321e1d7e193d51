//! Resilient consumption of newline-delimited event streams.
//!
//! The protocol handled here is simpler than full SSE framing: the server
//! keeps the connection open and writes arbitrary chunked text; every
//! newline-terminated, non-empty piece is one logical event. [`stream_events`]
//! issues the request, rejects status >= 400 responses with the decoded error
//! body, then delivers each segment to a caller-supplied handler for as long
//! as the connection stays open.
//!
//! # Failure isolation
//!
//! Long-lived streaming callers must survive a misbehaving handler. A handler
//! error stops the stream and is returned as [`HttpError::Handler`]; a
//! handler panic is caught at the chunk boundary, logged with the method and
//! URI, and returned as [`HttpError::HandlerPanic`]. Clean end of stream is
//! always `Ok(())`, so the three outcomes stay distinguishable.
//!
//! # Examples
//!
//! ```ignore
//! use eventline_http::stream_events;
//! use reqwest::Method;
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! stream_events(
//!     Method::POST,
//!     "https://api.example.com/chat/completions",
//!     &HashMap::new(),
//!     Some(&json!({ "stream": true })),
//!     None,
//!     |segment| {
//!         println!("event: {}", segment);
//!         Ok(())
//!     },
//! )
//! .await?;
//! ```

mod segment;
mod source;

pub use source::{open_event_source, open_event_source_with, EventSource};

use crate::client::transport::build_client;
use crate::client::{encode_body, fill_headers};
use crate::error::{BoxError, HttpError, Result};
use crate::proxy::ProxyConfig;
use futures::StreamExt;
use reqwest::Method;
use segment::SegmentSplitter;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

/// Upper bound on how many body bytes are segmented per read.
const READ_CHUNK_SIZE: usize = 20_480;

/// Options for [`stream_events_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOptions {
    /// Carry incomplete trailing fragments across chunk boundaries so every
    /// delivered segment is a complete line. Off by default: the documented
    /// behavior splits a spanning line at the chunk boundary.
    pub line_reassembly: bool,
}

/// Issue a request and deliver each newline-delimited segment to `on_segment`.
///
/// `body`, when present, is JSON-encoded into the request body. The handler
/// receives trimmed, non-empty segments in arrival order and may stop the
/// stream by returning an error. See the module docs for the failure model.
pub async fn stream_events<F>(
    method: Method,
    uri: &str,
    headers: &HashMap<String, String>,
    body: Option<&serde_json::Value>,
    config: Option<&ProxyConfig>,
    on_segment: F,
) -> Result<()>
where
    F: FnMut(&str) -> std::result::Result<(), BoxError>,
{
    stream_events_with(
        method,
        uri,
        headers,
        body,
        config,
        StreamOptions::default(),
        on_segment,
    )
    .await
}

/// [`stream_events`] with explicit [`StreamOptions`].
pub async fn stream_events_with<F>(
    method: Method,
    uri: &str,
    headers: &HashMap<String, String>,
    body: Option<&serde_json::Value>,
    config: Option<&ProxyConfig>,
    options: StreamOptions,
    mut on_segment: F,
) -> Result<()>
where
    F: FnMut(&str) -> std::result::Result<(), BoxError>,
{
    let response = send_request(method.clone(), uri, headers, body, config).await?;

    let mut splitter = SegmentSplitter::new(options.line_reassembly);
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for piece in chunk.chunks(READ_CHUNK_SIZE) {
            for segment in splitter.feed(piece) {
                deliver(&mut on_segment, &segment, &method, uri)?;
            }
        }
    }

    if let Some(rest) = splitter.finish() {
        deliver(&mut on_segment, &rest, &method, uri)?;
    }

    Ok(())
}

/// Build a per-call client, issue the request, and reject error statuses.
///
/// Segments are never produced from a status >= 400 response; its body is
/// consumed whole and folded into the returned [`HttpError::Status`].
pub(crate) async fn send_request(
    method: Method,
    uri: &str,
    headers: &HashMap<String, String>,
    body: Option<&serde_json::Value>,
    config: Option<&ProxyConfig>,
) -> Result<reqwest::Response> {
    let client = build_client(config).into_client();

    let mut builder = client.request(method, uri);
    builder = fill_headers(builder, headers)?;
    if let Some(body) = body {
        builder = builder.body(encode_body(body)?);
    }

    let response = builder.send().await?;

    let status = response.status();
    if status.as_u16() >= 400 {
        let status_line = status.to_string();
        let content = response.bytes().await.unwrap_or_default();
        return Err(HttpError::from_status(status_line, &content));
    }

    Ok(response)
}

/// Invoke the handler behind a panic boundary. A panicking handler must not
/// take down a long-lived streaming caller, but it must not look like a clean
/// end of stream either.
fn deliver<F>(on_segment: &mut F, segment: &str, method: &Method, uri: &str) -> Result<()>
where
    F: FnMut(&str) -> std::result::Result<(), BoxError>,
{
    match std::panic::catch_unwind(AssertUnwindSafe(|| on_segment(segment))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(HttpError::Handler(err)),
        Err(payload) => {
            let message = panic_message(payload);
            tracing::error!(%method, uri, "segment handler panicked: {}", message);
            Err(HttpError::HandlerPanic(message))
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
