//! Fetch tests against a loopback server. Each test spawns a one-shot
//! listener thread that serves a canned response, so nothing here touches
//! the real network.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use websift::{Error, fetch};

/// Serve one canned HTTP response on an ephemeral loopback port and return
/// the URL to request.
fn one_shot_server(status_line: &'static str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        // Read until the end of the request headers
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let header = format!(
            "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(header.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
    });

    format!("http://{addr}/")
}

#[test]
fn test_fetch_success_returns_body_and_status() {
    let url = one_shot_server("HTTP/1.1 200 OK", b"<dl><dt>order</dt></dl>");
    let fetched = fetch(&url, Duration::from_secs(5)).unwrap();

    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.bytes, b"<dl><dt>order</dt></dl>");
}

#[test]
fn test_fetch_non_success_is_status_error() {
    let url = one_shot_server("HTTP/1.1 404 Not Found", b"missing");
    let err = fetch(&url, Duration::from_secs(5)).unwrap_err();

    match err {
        Error::HttpStatus { status, url: u } => {
            assert_eq!(status, 404);
            assert_eq!(u, url);
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[test]
fn test_fetch_refused_connection_is_network_error() {
    // Bind a port to learn an address, then drop the listener before
    // fetching so the connection is refused
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fetch(&format!("http://{addr}/"), Duration::from_secs(2)).unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}
