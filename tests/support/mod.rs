//! In-process HTTP responder for exchange tests
//!
//! Accepts a single connection, captures the request body and answers with
//! a scripted sequence of writes.

#![allow(dead_code)]

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One step of a scripted response
pub enum Step {
    Write(Vec<u8>),
    Sleep(Duration),
}

pub fn write(data: impl Into<Vec<u8>>) -> Step {
    Step::Write(data.into())
}

pub fn sleep_ms(ms: u64) -> Step {
    Step::Sleep(Duration::from_millis(ms))
}

/// Headers for a close-delimited streamed body
pub fn ndjson_headers() -> Step {
    write(
        "HTTP/1.1 200 OK\r\nContent-Type: application/x-ndjson\r\nConnection: close\r\n\r\n",
    )
}

pub fn delta(text: &str) -> String {
    format!(
        "{}\n",
        serde_json::json!({
            "model": "test-model",
            "message": { "role": "assistant", "content": text },
            "done": false
        })
    )
}

pub fn done() -> String {
    "{\"model\":\"test-model\",\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true}\n"
        .to_string()
}

/// Running responder
pub struct MockServer {
    pub url: String,
    handle: JoinHandle<String>,
}

impl MockServer {
    /// Serve one request with the given steps, then close the connection
    pub async fn start(steps: Vec<Step>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let body = read_request_body(&mut socket).await;

            for step in steps {
                match step {
                    Step::Write(data) => {
                        if socket.write_all(&data).await.is_err() {
                            break;
                        }
                        let _ = socket.flush().await;
                    }
                    Step::Sleep(duration) => tokio::time::sleep(duration).await,
                }
            }
            let _ = socket.shutdown().await;
            body
        });

        MockServer {
            url: format!("http://{}/api/chat", addr),
            handle,
        }
    }

    /// Request body the client sent
    pub async fn request_body(self) -> serde_json::Value {
        let body = self.handle.await.unwrap();
        serde_json::from_str(&body).unwrap()
    }
}

/// URL on which nothing is listening
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/chat", addr)
}

async fn read_request_body(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&data[header_end..]).into_owned()
}
