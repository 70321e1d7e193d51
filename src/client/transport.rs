//! Transport factory.
//!
//! Builds a [`reqwest::Client`] wired for a caller-supplied [`ProxyConfig`]:
//! direct connection, HTTP(S) forward proxy, or SOCKS5. Every client carries
//! the same fixed timeout ceiling and has TLS certificate verification
//! disabled; upstream endpoints are frequently fronted by self-signed or
//! mismatched certificates and the surrounding system accepts that risk.
//!
//! Configuration failures never propagate. A proxy address that does not
//! parse degrades to a direct connection with a logged warning, and the
//! degradation reason stays observable on the returned
//! [`TransportSelection`].

use crate::proxy::{ProxyConfig, ProxyKind};
use reqwest::Client;
use std::time::Duration;

/// Upper bound on a single exchange, including long-lived streaming reads.
pub(crate) const MAX_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Outcome of building a client for a proxy descriptor.
///
/// `Degraded` still carries a fully working direct-transport client; the
/// reason is retained so call sites can count or report fallbacks instead of
/// losing the information after the log line.
#[derive(Debug)]
pub enum TransportSelection {
    /// The client matches the requested configuration.
    Configured(Client),
    /// The proxy configuration was unusable; a direct client is provided.
    Degraded {
        /// Direct-transport fallback client.
        client: Client,
        /// Why the requested configuration was abandoned.
        reason: String,
    },
}

impl TransportSelection {
    /// The usable client, whichever way the build went.
    pub fn client(&self) -> &Client {
        match self {
            TransportSelection::Configured(client) => client,
            TransportSelection::Degraded { client, .. } => client,
        }
    }

    /// Consume the selection, returning the usable client.
    pub fn into_client(self) -> Client {
        match self {
            TransportSelection::Configured(client) => client,
            TransportSelection::Degraded { client, .. } => client,
        }
    }

    /// The degradation reason, when a fallback occurred.
    pub fn degrade_reason(&self) -> Option<&str> {
        match self {
            TransportSelection::Configured(_) => None,
            TransportSelection::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// Build a client for the given proxy descriptor.
///
/// `None` or [`ProxyKind::None`] produce a direct client. HTTP(S) descriptors
/// route every connection through the proxy URL; SOCKS5 descriptors route
/// every outbound dial through the SOCKS endpoint, unauthenticated. A
/// descriptor whose address cannot be turned into a proxy is logged and
/// degraded to the direct client rather than failed.
pub fn build_client(config: Option<&ProxyConfig>) -> TransportSelection {
    let config = match config {
        Some(config) if config.kind != ProxyKind::None => config,
        _ => return TransportSelection::Configured(direct_client()),
    };

    let proxy = match config.kind {
        ProxyKind::Http | ProxyKind::Https => match url::Url::parse(&config.address) {
            Ok(proxy_url) => reqwest::Proxy::all(proxy_url),
            Err(err) => {
                let reason = format!("failed to parse proxy url: {}", err);
                tracing::warn!("{}", reason);
                return TransportSelection::Degraded {
                    client: direct_client(),
                    reason,
                };
            }
        },
        ProxyKind::Socks5 => reqwest::Proxy::all(socks5_url(&config.address)),
        ProxyKind::None => unreachable!("filtered above"),
    };

    let proxy = match proxy {
        Ok(proxy) => proxy,
        Err(err) => {
            let reason = format!("failed to create proxy: {}", err);
            tracing::warn!("{}", reason);
            return TransportSelection::Degraded {
                client: direct_client(),
                reason,
            };
        }
    };

    match base_builder().proxy(proxy).build() {
        Ok(client) => {
            tracing::debug!("[proxy] configured proxy: {}", config.address);
            TransportSelection::Configured(client)
        }
        Err(err) => {
            let reason = format!("failed to build proxied client: {}", err);
            tracing::warn!("{}", reason);
            TransportSelection::Degraded {
                client: direct_client(),
                reason,
            }
        }
    }
}

fn base_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(MAX_TIMEOUT)
        .danger_accept_invalid_certs(true)
}

fn direct_client() -> Client {
    base_builder().build().unwrap_or_default()
}

/// SOCKS5 addresses are dialer-style `host:port` pairs; accept an explicit
/// scheme as well.
fn socks5_url(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("socks5://{}", address)
    }
}
