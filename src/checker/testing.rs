// src/checker/testing.rs
// =============================================================================
// Test-only helpers:
// - ScriptedTransport: answers from a per-URL script, with optional delays,
//   and counts how many times each URL was requested
// - TestServer: a tiny local HTTP responder on 127.0.0.1
//     /status/<code>  -> responds with <code>
//     /redirect       -> 302 to /status/200
//     /stall          -> reads the request, never answers
//     anything else   -> 200
// - refused_url(): a URL whose port nobody listens on
// =============================================================================

use super::probe::Transport;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Result<u16, String>>>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `times` transport failures for `url`
    pub fn fail(self, url: &str, times: usize, message: &str) -> Self {
        for _ in 0..times {
            self.push(url, Err(message.to_string()));
        }
        self
    }

    /// Queues one response with `code` for `url`
    pub fn respond(self, url: &str, code: u16) -> Self {
        self.push(url, Ok(code));
        self
    }

    /// Every request to `url` takes `delay` before answering
    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn push(&self, url: &str, step: Result<u16, String>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(step);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<u16, String> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        self.scripts
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(format!("unscripted request to {}", url)))
    }
}

pub struct TestServer {
    base: String,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);

                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    if path == "/stall" {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        return;
                    }
                    let response = respond_to(path);

                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base: format!("127.0.0.1:{}", addr.port()),
            hits,
        }
    }

    /// host:port, usable as a domain to substitute into templates
    pub fn authority(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.base, path)
    }

    /// Number of connections accepted so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn respond_to(path: &str) -> String {
    if path == "/redirect" {
        return "HTTP/1.1 302 Found\r\nLocation: /status/200\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string();
    }

    let code = path
        .strip_prefix("/status/")
        .and_then(|code| code.parse::<u16>().ok())
        .unwrap_or(200);

    format!(
        "HTTP/1.1 {} Test\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        code
    )
}

/// A URL on a local port that was bound and released again
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}
