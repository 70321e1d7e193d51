//! HTTP client construction and single-shot request execution.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── transport - proxy-aware client factory
//! └── request   - request/response helpers (JSON and raw)
//! ```
//!
//! # Key Items
//!
//! | Item | Description |
//! |------|-------------|
//! | [`build_client`] | Build a client for an optional [`ProxyConfig`](crate::ProxyConfig) |
//! | [`TransportSelection`] | Configured-or-degraded factory outcome |
//! | [`http_json`] / [`http_raw`] | Base request shapes |
//! | [`get`] / [`get_raw`] / [`post`] / [`post_raw`] | Method-pinned helpers |
//!
//! Every helper builds a fresh client per call; concurrent calls share no
//! state. All clients carry a 30-minute timeout ceiling and skip TLS
//! certificate verification; see [`build_client`] for details.

mod request;
pub(crate) mod transport;

pub use request::{get, get_raw, http_json, http_raw, post, post_raw};
pub use transport::{build_client, TransportSelection};

pub(crate) use request::{encode_body, fill_headers};
