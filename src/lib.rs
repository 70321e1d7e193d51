#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Eventline-HTTP: proxy-aware requests and event streaming
//!
//! This crate is a small HTTP access layer with three pieces:
//!
//! 1. **Transport factory** - builds a [`reqwest::Client`] routed directly,
//!    through an HTTP(S) forward proxy, or through a SOCKS5 proxy, from a
//!    caller-supplied [`ProxyConfig`]. Misconfiguration degrades to a direct
//!    connection instead of failing ([`TransportSelection`]).
//! 2. **Request helpers** - single-shot [`get`]/[`post`]/[`http_json`]/
//!    [`http_raw`] calls that decode JSON or return raw bytes.
//! 3. **Stream consumer** - [`stream_events`] and [`open_event_source`],
//!    which hold a connection open and deliver newline-delimited text
//!    segments as they arrive, isolating handler errors and panics from the
//!    host process.
//!
//! The streamed protocol is deliberately simpler than SSE: no `event:`/`data:`
//! field framing, just chunked text split on newlines, each trimmed non-empty
//! line being one logical event. This matches the wire format of most
//! LLM-style completion APIs and log-follow endpoints.
//!
//! ## Quick start
//!
//! ```ignore
//! use eventline_http::{stream_events, ProxyConfig};
//! use reqwest::Method;
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> eventline_http::Result<()> {
//!     stream_events(
//!         Method::POST,
//!         "https://api.example.com/v1/completions",
//!         &HashMap::new(),
//!         Some(&json!({ "stream": true })),
//!         Some(&ProxyConfig::socks5("127.0.0.1:1080")),
//!         |segment| {
//!             println!("{}", segment);
//!             Ok(())
//!         },
//!     )
//!     .await
//! }
//! ```
//!
//! ## Security posture
//!
//! Every client built by this crate disables TLS certificate verification
//! and applies a fixed 30-minute timeout. This is a deliberate policy of the
//! system this crate serves, which talks to many self-hosted upstreams with
//! self-signed certificates; do not reuse the factory where certificate
//! verification matters.
//!
//! ## Module Structure
//!
//! - **[client]** - transport factory and request helpers
//! - **[stream]** - newline-delimited event stream consumer
//! - **[proxy]** - proxy descriptor value objects
//! - **[error]** - error taxonomy and result alias

pub mod client;
pub mod error;
pub mod proxy;
pub mod stream;

pub use client::{build_client, get, get_raw, http_json, http_raw, post, post_raw, TransportSelection};
pub use error::{BoxError, HttpError, Result};
pub use proxy::{ProxyConfig, ProxyKind};
pub use stream::{
    open_event_source, open_event_source_with, stream_events, stream_events_with, EventSource,
    StreamOptions,
};

pub use reqwest::Method;
