//! Channel-backed event source.
//!
//! [`open_event_source`] is the pull-based sibling of
//! [`stream_events`](crate::stream_events): instead of pushing segments into
//! a handler, it hands back an [`EventSource`] that yields them one at a
//! time, usable directly or through `StreamExt` combinators.
//!
//! The connection is established before the source is returned, so status
//! and transport failures surface immediately from [`open_event_source`]
//! rather than as the first stream item. The reading task runs until the
//! server closes the connection or the source is dropped; a bounded channel
//! keeps the read loop at the consumer's pace.
//!
//! # Examples
//!
//! ```ignore
//! use eventline_http::open_event_source;
//! use reqwest::Method;
//! use std::collections::HashMap;
//!
//! let mut source = open_event_source(
//!     Method::GET,
//!     "https://api.example.com/events",
//!     &HashMap::new(),
//!     None,
//!     None,
//! )
//! .await?;
//!
//! while let Some(result) = source.next().await {
//!     match result {
//!         Ok(segment) => println!("event: {}", segment),
//!         Err(err) => eprintln!("stream error: {}", err),
//!     }
//! }
//! ```

use crate::error::Result;
use crate::proxy::ProxyConfig;
use crate::stream::segment::SegmentSplitter;
use crate::stream::{send_request, StreamOptions, READ_CHUNK_SIZE};
use futures::Stream;
use reqwest::Method;
use std::collections::HashMap;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

const CHANNEL_CAPACITY: usize = 100;

/// A live, server-pushed stream of text segments.
///
/// Yields `Ok(segment)` per event, `Err` once if the stream fails mid-read,
/// and `None` after the connection closes. Dropping the source stops the
/// reading task on its next send.
#[derive(Debug)]
pub struct EventSource {
    receiver: mpsc::Receiver<Result<String>>,
}

impl EventSource {
    /// Receive the next segment, or `None` once the stream has ended.
    pub async fn next(&mut self) -> Option<Result<String>> {
        self.receiver.recv().await
    }

    /// Convert into a [`ReceiverStream`] for ownership-taking pipelines.
    pub fn into_stream(self) -> ReceiverStream<Result<String>> {
        ReceiverStream::new(self.receiver)
    }
}

impl Stream for EventSource {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Connect to `uri` and return an [`EventSource`] over its segments.
///
/// Fails up front with the same errors as
/// [`stream_events`](crate::stream_events) when the request cannot be sent
/// or the server answers with status >= 400.
pub async fn open_event_source(
    method: Method,
    uri: &str,
    headers: &HashMap<String, String>,
    body: Option<&serde_json::Value>,
    config: Option<&ProxyConfig>,
) -> Result<EventSource> {
    open_event_source_with(method, uri, headers, body, config, StreamOptions::default()).await
}

/// [`open_event_source`] with explicit [`StreamOptions`].
pub async fn open_event_source_with(
    method: Method,
    uri: &str,
    headers: &HashMap<String, String>,
    body: Option<&serde_json::Value>,
    config: Option<&ProxyConfig>,
    options: StreamOptions,
) -> Result<EventSource> {
    let response = send_request(method, uri, headers, body, config).await?;

    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        use futures::StreamExt;

        let mut splitter = SegmentSplitter::new(options.line_reassembly);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = tx.send(Err(err.into())).await;
                    return;
                }
            };

            for piece in chunk.chunks(READ_CHUNK_SIZE) {
                for segment in splitter.feed(piece) {
                    if tx.send(Ok(segment)).await.is_err() {
                        return; // receiver dropped
                    }
                }
            }
        }

        if let Some(rest) = splitter.finish() {
            let _ = tx.send(Ok(rest)).await;
        }
    });

    Ok(EventSource { receiver: rx })
}
