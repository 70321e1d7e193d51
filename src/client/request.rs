//! Single-shot request execution.
//!
//! Thin helpers over the transport factory for one-request/one-response
//! exchanges. Two base shapes exist: [`http_json`] decodes the response body
//! as JSON into a caller-chosen type, [`http_raw`] hands the body back
//! untouched. The `get`/`post` family pins the method and, for POST,
//! JSON-encodes a caller-supplied body value.
//!
//! Each call builds its own client through [`build_client`]; there is no
//! shared pool and no shared state between concurrent calls.
//!
//! # Examples
//!
//! ```ignore
//! use eventline_http::{get, post, ProxyConfig};
//! use serde_json::{json, Value};
//! use std::collections::HashMap;
//!
//! let headers = HashMap::from([("Authorization".to_string(), "Bearer ...".to_string())]);
//! let data: Value = get("https://api.example.com/models", &headers, None).await?;
//!
//! let reply: Value = post(
//!     "https://api.example.com/chat",
//!     &headers,
//!     &json!({ "prompt": "hi" }),
//!     Some(&ProxyConfig::socks5("127.0.0.1:1080")),
//! )
//! .await?;
//! ```

use crate::client::transport::build_client;
use crate::error::{HttpError, Result};
use crate::proxy::ProxyConfig;
use bytes::Bytes;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// Attach caller headers to a request.
pub(crate) fn fill_headers(
    mut builder: RequestBuilder,
    headers: &HashMap<String, String>,
) -> Result<RequestBuilder> {
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|err| HttpError::InvalidRequest(format!("header {:?}: {}", key, err)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| HttpError::InvalidRequest(format!("header {:?}: {}", key, err)))?;
        builder = builder.header(name, value);
    }
    Ok(builder)
}

/// JSON-encode a request body value. Encoding failures propagate instead of
/// silently sending an empty body.
pub(crate) fn encode_body<T: Serialize + ?Sized>(body: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(HttpError::Encode)
}

async fn execute(
    uri: &str,
    method: Method,
    headers: &HashMap<String, String>,
    body: Option<Vec<u8>>,
    config: Option<&ProxyConfig>,
) -> Result<Response> {
    let client = build_client(config).into_client();
    let mut builder = client.request(method, uri);
    builder = fill_headers(builder, headers)?;
    if let Some(body) = body {
        builder = builder.body(body);
    }
    Ok(builder.send().await?)
}

/// Perform a request and decode the response body as JSON into `T`.
///
/// Returns [`HttpError::Transport`] when the exchange fails and
/// [`HttpError::Decode`] when the body is not valid JSON for `T`.
pub async fn http_json<T: DeserializeOwned>(
    uri: &str,
    method: Method,
    headers: &HashMap<String, String>,
    body: Option<Vec<u8>>,
    config: Option<&ProxyConfig>,
) -> Result<T> {
    let response = execute(uri, method, headers, body, config).await?;
    let data = response.bytes().await?;
    serde_json::from_slice(&data).map_err(HttpError::Decode)
}

/// Perform a request and return the response body untouched.
pub async fn http_raw(
    uri: &str,
    method: Method,
    headers: &HashMap<String, String>,
    body: Option<Vec<u8>>,
    config: Option<&ProxyConfig>,
) -> Result<Bytes> {
    let response = execute(uri, method, headers, body, config).await?;
    Ok(response.bytes().await?)
}

/// GET `uri` and decode the response as JSON.
pub async fn get<T: DeserializeOwned>(
    uri: &str,
    headers: &HashMap<String, String>,
    config: Option<&ProxyConfig>,
) -> Result<T> {
    http_json(uri, Method::GET, headers, None, config).await
}

/// GET `uri` and return the response body as text.
pub async fn get_raw(
    uri: &str,
    headers: &HashMap<String, String>,
    config: Option<&ProxyConfig>,
) -> Result<String> {
    let data = http_raw(uri, Method::GET, headers, None, config).await?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// POST a JSON-encoded `body` to `uri` and decode the response as JSON.
pub async fn post<B, T>(
    uri: &str,
    headers: &HashMap<String, String>,
    body: &B,
    config: Option<&ProxyConfig>,
) -> Result<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let encoded = encode_body(body)?;
    http_json(uri, Method::POST, headers, Some(encoded), config).await
}

/// POST a JSON-encoded `body` to `uri` and return the response body as text.
pub async fn post_raw<B: Serialize + ?Sized>(
    uri: &str,
    headers: &HashMap<String, String>,
    body: &B,
    config: Option<&ProxyConfig>,
) -> Result<String> {
    let encoded = encode_body(body)?;
    let data = http_raw(uri, Method::POST, headers, Some(encoded), config).await?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
