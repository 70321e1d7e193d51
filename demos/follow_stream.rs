//! Follow a newline-delimited event stream from the command line.
//!
//! Usage:
//!
//! ```text
//! cargo run --example follow_stream -- http://127.0.0.1:8000/events [socks5-proxy]
//! ```

use eventline_http::{stream_events, Method, ProxyConfig};
use std::collections::HashMap;

#[tokio::main]
async fn main() -> eventline_http::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let uri = args
        .next()
        .unwrap_or_else(|| "http://127.0.0.1:8000/events".to_string());
    let proxy = args.next().map(ProxyConfig::socks5);

    let mut count = 0usize;
    stream_events(
        Method::GET,
        &uri,
        &HashMap::new(),
        None,
        proxy.as_ref(),
        |segment| {
            count += 1;
            println!("[{:>4}] {}", count, segment);
            Ok(())
        },
    )
    .await?;

    println!("stream closed after {} segments", count);
    Ok(())
}
