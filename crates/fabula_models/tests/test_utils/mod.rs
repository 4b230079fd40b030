//! Test utilities for the provider clients.
//!
//! Provides a one-shot HTTP server that answers a single request with a
//! canned response, so client error mapping can be tested without a network.

use fabula_core::{GenerateRequest, Message};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Helper to create a test GenerateRequest using the builder pattern.
pub fn create_test_request(prompt: &str, max_tokens: Option<u32>) -> GenerateRequest {
    GenerateRequest::builder()
        .messages(vec![Message::user(prompt)])
        .max_tokens(max_tokens)
        .temperature(Some(0.7))
        .build()
        .expect("Failed to build test request")
}

/// A canned HTTP response.
pub struct CannedResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "application/json".to_string())],
            body: body.to_string(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

/// Serve `response` to the first connection.
///
/// Returns the base URL to point the client at and a handle resolving to the
/// raw request the client sent.
pub async fn serve_once(response: CannedResponse) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("No client connected");
        let request = read_request(&mut socket).await;

        let mut raw = format!(
            "HTTP/1.1 {} Canned\r\nContent-Length: {}\r\nConnection: close\r\n",
            response.status,
            response.body.len()
        );
        for (name, value) in &response.headers {
            raw.push_str(&format!("{}: {}\r\n", name, value));
        }
        raw.push_str("\r\n");
        raw.push_str(&response.body);
        socket
            .write_all(raw.as_bytes())
            .await
            .expect("Failed to write response");
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{}/v1", addr), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.expect("Failed to read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
