//! src/fetcher.rs
//!
//! Responsibilities of this module:
//!   1) Issue a single HTTP GET for a URL, with a hard wall-clock deadline.
//!   2) Read the full response body as UTF-8 text (lossy), regardless of
//!      status code -- only transport errors are inspected, never HTTP
//!      status, so a 404 with a body is `Ok(body)` here too.
//!   3) Classify any transport-layer failure into the fixed `UrlStatus`
//!      error taxonomy the rest of the engine speaks.
//!
//! `tokio::time::timeout` wraps the whole request/response exchange: on
//! expiry the inner future is dropped, which cancels the in-flight request
//! and yields `ErrorTimeout` regardless of whatever partial response
//! existed.

use std::time::Duration;

use reqwest::Client;

use crate::status::UrlStatus;

/// The fixed per-request deadline. Not user-configurable
/// in the CLI collaborator; exposed here as a constant so tests can still
/// override it by calling `fetch` directly with a shorter duration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Perform one GET against `url`, aborting if it has not completed within
/// `timeout`.
///
/// Returns the decoded body on success, or the terminal `UrlStatus::Err*`
/// variant the failure classifies to (never `Process` or `Found`/`NotFound`
/// -- those are decided by the caller after inspecting the body).
pub async fn fetch(client: &Client, url: &str, timeout: Duration) -> Result<String, UrlStatus> {
    match tokio::time::timeout(timeout, fetch_inner(client, url)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(UrlStatus::ErrTimeout),
    }
}

async fn fetch_inner(client: &Client, url: &str) -> Result<String, UrlStatus> {
    let response = client.get(url).send().await.map_err(classify)?;
    let bytes = response.bytes().await.map_err(classify)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Map a `reqwest::Error` onto the fixed `UrlStatus` error taxonomy.
///
/// `reqwest` does not expose as granular a taxonomy as some networking
/// stacks do, so this walks `is_*()` predicates first and falls back to
/// scanning the error's `Display` text (which includes the underlying
/// `hyper`/`std::io`/TLS error) for recognizable substrings. Anything that
/// matches nothing collapses to `ErrUnknown`.
fn classify(err: reqwest::Error) -> UrlStatus {
    if err.is_timeout() {
        return UrlStatus::ErrTimeout;
    }

    let text = error_chain_text(&err);

    if text.contains("dns error") || text.contains("failed to lookup address") || text.contains("name resolution")
    {
        return UrlStatus::ErrHostNotFound;
    }
    if text.contains("connection refused") {
        return UrlStatus::ErrConnectionRefused;
    }
    if text.contains("certificate") || text.contains("ssl") || text.contains("tls") || text.contains("handshake") {
        return UrlStatus::ErrSslHandshake;
    }
    if text.contains("connection reset")
        || text.contains("connection closed")
        || text.contains("broken pipe")
        || text.contains("unexpected eof")
    {
        return UrlStatus::ErrRemoteHostClosed;
    }
    if text.contains("operation canceled") || text.contains("operation cancelled") {
        return UrlStatus::ErrOperationCanceled;
    }

    if err.is_connect() {
        return UrlStatus::ErrUnknownNetwork;
    }
    if err.is_body() || err.is_decode() {
        return UrlStatus::ErrTemporaryNetwork;
    }
    if err.is_request() || err.is_builder() {
        return UrlStatus::ErrProtocolUnknown;
    }

    UrlStatus::ErrUnknown
}

/// Flatten an error and its `source()` chain into one lowercase string so
/// classification can substring-match across whichever layer (hyper,
/// std::io, rustls) actually carries the useful detail.
fn error_chain_text(err: &reqwest::Error) -> String {
    use std::error::Error as _;

    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        text.push_str(": ");
        text.push_str(&e.to_string());
        source = e.source();
    }
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;

    #[tokio::test]
    async fn fetch_ignores_http_status_and_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not here, but still a body")
            .create_async()
            .await;

        let client = Client::new();
        let url = format!("{}/missing", server.url());
        let result = fetch(&client, &url, DEFAULT_TIMEOUT).await;

        assert_eq!(result, Ok("not here, but still a body".to_string()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_returns_ok_on_200() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("hello needle world")
            .create_async()
            .await;

        let client = Client::new();
        let result = fetch(&client, &server.url(), DEFAULT_TIMEOUT).await;
        assert_eq!(result, Ok("hello needle world".to_string()));
    }

    #[tokio::test]
    async fn fetch_times_out_against_a_stalled_connection() {
        // A listener that accepts but never writes a response: the request
        // hangs until our deadline fires.
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        std::thread::spawn(move || {
            // Accept one connection and hold it open without responding.
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                std::thread::sleep(Duration::from_secs(10));
            }
        });

        let client = Client::new();
        let url = format!("http://{addr}/");
        let result = fetch(&client, &url, Duration::from_millis(150)).await;

        assert_eq!(result, Err(UrlStatus::ErrTimeout));
    }

    #[tokio::test]
    async fn fetch_classifies_connection_refused() {
        // Bind then drop immediately so the port is refused on connect.
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let client = Client::new();
        let url = format!("http://{addr}/");
        let result = fetch(&client, &url, Duration::from_millis(500)).await;

        assert_eq!(result, Err(UrlStatus::ErrConnectionRefused));
    }
}
