//! Proxy descriptors.
//!
//! A [`ProxyConfig`] is a caller-supplied routing instruction: route requests
//! directly, through an HTTP(S) forward proxy, or through a SOCKS5 proxy.
//! The value is owned by the caller (typically loaded from its configuration)
//! and passed by reference into the transport factory; it is never validated
//! here. A malformed address degrades to a direct connection at build time,
//! see [`crate::client::build_client`].
//!
//! # Examples
//!
//! ```
//! use eventline_http::{ProxyConfig, ProxyKind};
//!
//! let direct = ProxyConfig::none();
//! assert_eq!(direct.kind, ProxyKind::None);
//!
//! let socks = ProxyConfig::socks5("127.0.0.1:1080");
//! assert_eq!(socks.kind, ProxyKind::Socks5);
//! ```

use serde::{Deserialize, Serialize};

/// The kind of proxy a request should be routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    /// Direct connection, no proxy.
    #[default]
    None,
    /// HTTP forward proxy.
    Http,
    /// HTTPS forward proxy.
    Https,
    /// SOCKS5 proxy, no authentication.
    Socks5,
}

/// A caller-supplied proxy routing instruction.
///
/// `address` is a URL for [`ProxyKind::Http`]/[`ProxyKind::Https`]
/// (e.g. `http://127.0.0.1:7890`) and a `host:port` pair for
/// [`ProxyKind::Socks5`] (a `socks5://` scheme is also accepted).
/// Ignored when `kind` is [`ProxyKind::None`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy kind selecting the transport wiring.
    pub kind: ProxyKind,
    /// Proxy address; interpretation depends on `kind`.
    #[serde(default)]
    pub address: String,
}

impl ProxyConfig {
    /// A descriptor requesting a direct connection.
    pub fn none() -> Self {
        Self::default()
    }

    /// An HTTP forward proxy at `address`.
    pub fn http(address: impl Into<String>) -> Self {
        Self {
            kind: ProxyKind::Http,
            address: address.into(),
        }
    }

    /// An HTTPS forward proxy at `address`.
    pub fn https(address: impl Into<String>) -> Self {
        Self {
            kind: ProxyKind::Https,
            address: address.into(),
        }
    }

    /// A SOCKS5 proxy at `address` (`host:port`), no authentication.
    pub fn socks5(address: impl Into<String>) -> Self {
        Self {
            kind: ProxyKind::Socks5,
            address: address.into(),
        }
    }
}
