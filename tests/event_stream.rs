//! Integration tests for the event stream consumer, against mockito.

use eventline_http::{
    open_event_source, stream_events, stream_events_with, HttpError, Method, ProxyConfig,
    StreamOptions,
};
use futures::StreamExt;
use serde_json::{json, Value};
use std::collections::HashMap;

fn no_headers() -> HashMap<String, String> {
    HashMap::new()
}

#[tokio::test]
async fn segments_are_delivered_trimmed_and_in_order() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/events")
        .with_status(200)
        .with_body("a\nb\n\nc")
        .create_async()
        .await;

    let mut seen = Vec::new();
    stream_events(
        Method::GET,
        &format!("{}/events", server.url()),
        &no_headers(),
        None,
        None,
        |segment| {
            seen.push(segment.to_string());
            Ok(())
        },
    )
    .await
    .unwrap();

    assert_eq!(seen, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn empty_body_completes_with_no_segments() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/quiet")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let mut count = 0usize;
    stream_events(
        Method::GET,
        &format!("{}/quiet", server.url()),
        &no_headers(),
        None,
        None,
        |_| {
            count += 1;
            Ok(())
        },
    )
    .await
    .unwrap();

    assert_eq!(count, 0);
}

#[tokio::test]
async fn error_status_never_reaches_the_handler() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/stream")
        .with_status(401)
        .with_body(r#"{"error":{"message":"bad key"}}"#)
        .create_async()
        .await;

    let mut invoked = false;
    let err = stream_events(
        Method::POST,
        &format!("{}/stream", server.url()),
        &no_headers(),
        Some(&json!({"stream": true})),
        None,
        |_| {
            invoked = true;
            Ok(())
        },
    )
    .await
    .unwrap_err();

    assert!(!invoked);
    match &err {
        HttpError::Status { status_line, detail } => {
            assert!(status_line.starts_with("401"));
            let detail = detail.as_deref().expect("JSON body should be embedded");
            assert!(detail.contains("\"message\": \"bad key\""));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("```json"));
}

#[tokio::test]
async fn error_status_with_plain_body_keeps_status_line_only() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/oops")
        .with_status(502)
        .with_body("upstream fell over")
        .create_async()
        .await;

    let err = stream_events(
        Method::GET,
        &format!("{}/oops", server.url()),
        &no_headers(),
        None,
        None,
        |_| Ok(()),
    )
    .await
    .unwrap_err();

    match err {
        HttpError::Status { detail, .. } => assert!(detail.is_none()),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn handler_error_stops_the_stream_immediately() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/events")
        .with_status(200)
        .with_body("one\ntwo\nthree\n")
        .create_async()
        .await;

    let mut seen = Vec::new();
    let err = stream_events(
        Method::GET,
        &format!("{}/events", server.url()),
        &no_headers(),
        None,
        None,
        |segment| {
            seen.push(segment.to_string());
            if seen.len() == 2 {
                Err("enough".into())
            } else {
                Ok(())
            }
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, HttpError::Handler(_)));
    assert_eq!(seen, vec!["one", "two"]);
}

#[tokio::test]
async fn handler_panic_is_caught_and_surfaced() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/events")
        .with_status(200)
        .with_body("boom\nnever\n")
        .create_async()
        .await;

    let err = stream_events(
        Method::GET,
        &format!("{}/events", server.url()),
        &no_headers(),
        None,
        None,
        |_| panic!("handler exploded"),
    )
    .await
    .unwrap_err();

    match err {
        HttpError::HandlerPanic(message) => assert_eq!(message, "handler exploded"),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn request_body_is_json_encoded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/stream")
        .match_body(mockito::Matcher::Json(json!({"model": "m1"})))
        .with_status(200)
        .with_body("ok\n")
        .create_async()
        .await;

    stream_events(
        Method::POST,
        &format!("{}/stream", server.url()),
        &no_headers(),
        Some(&json!({"model": "m1"})),
        None,
        |_| Ok(()),
    )
    .await
    .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn degraded_proxy_still_streams_directly() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/events")
        .with_status(200)
        .with_body("still here\n")
        .create_async()
        .await;

    let mut seen = Vec::new();
    stream_events(
        Method::GET,
        &format!("{}/events", server.url()),
        &no_headers(),
        None,
        Some(&ProxyConfig::https("%%% bad address %%%")),
        |segment| {
            seen.push(segment.to_string());
            Ok(())
        },
    )
    .await
    .unwrap();

    assert_eq!(seen, vec!["still here"]);
}

#[tokio::test]
async fn line_reassembly_flushes_trailing_fragment() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/events")
        .with_status(200)
        .with_body("first\nsecond")
        .create_async()
        .await;

    let mut seen = Vec::new();
    stream_events_with(
        Method::GET,
        &format!("{}/events", server.url()),
        &no_headers(),
        None,
        None,
        StreamOptions {
            line_reassembly: true,
        },
        |segment| {
            seen.push(segment.to_string());
            Ok(())
        },
    )
    .await
    .unwrap();

    assert_eq!(seen, vec!["first", "second"]);
}

#[tokio::test]
async fn event_source_yields_segments_then_closes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/events")
        .with_status(200)
        .with_body("alpha\nbeta\n")
        .create_async()
        .await;

    let mut source = open_event_source(
        Method::GET,
        &format!("{}/events", server.url()),
        &no_headers(),
        None,
        None,
    )
    .await
    .unwrap();

    assert_eq!(source.next().await.unwrap().unwrap(), "alpha");
    assert_eq!(source.next().await.unwrap().unwrap(), "beta");
    assert!(source.next().await.is_none());
}

#[tokio::test]
async fn event_source_rejects_error_status_up_front() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/events")
        .with_status(404)
        .with_body("gone")
        .create_async()
        .await;

    let err = open_event_source(
        Method::GET,
        &format!("{}/events", server.url()),
        &no_headers(),
        None,
        None,
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn event_source_works_with_stream_combinators() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/events")
        .with_status(200)
        .with_body("1\n2\n3\n")
        .create_async()
        .await;

    let source = open_event_source(
        Method::GET,
        &format!("{}/events", server.url()),
        &no_headers(),
        None,
        None,
    )
    .await
    .unwrap();

    let first_two: Vec<String> = source
        .take(2)
        .filter_map(|result| async move { result.ok() })
        .collect()
        .await;

    assert_eq!(first_two, vec!["1", "2"]);
}

#[tokio::test]
async fn unreachable_host_fails_before_any_delivery() {
    let mut invoked = false;
    let err = stream_events(
        Method::GET,
        "http://127.0.0.1:1/events",
        &no_headers(),
        None,
        None,
        |_| {
            invoked = true;
            Ok(())
        },
    )
    .await
    .unwrap_err();

    assert!(err.is_transport());
    assert!(!invoked);
}

// Decoding a body value and reading it back through serde_json reproduces the
// original structure.
#[test]
fn body_encoding_round_trips() {
    let value = json!({
        "model": "m1",
        "messages": [{"role": "user", "content": "hi"}],
        "temperature": 0.7,
        "stream": true,
    });
    let encoded = serde_json::to_vec(&value).unwrap();
    let back: Value = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(back, value);
}
