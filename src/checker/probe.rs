// src/checker/probe.rs
// =============================================================================
// This module checks a single URL with an HTTP GET, retrying on failure.
//
// Key rules:
// - ANY response counts as an answer, whatever its status (404 and 500
//   included). It is returned immediately, without retrying.
// - Only transport failures (DNS, refused connection, TLS, timeout) are
//   retried: up to `attempts` tries in total, `backoff` apart.
// - After the last failed try, the last error message becomes the outcome.
//
// The network sits behind the Transport trait so the retry logic can be
// exercised with scripted transports in tests.
//
// Rust concepts:
// - Traits: Transport is the seam between "what to do" and "how to send"
// - async-trait: lets a trait method be async and still be used as &dyn
// =============================================================================

use crate::config::{AuditConfig, RetryPolicy};
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

/// What one probe ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A response arrived with this HTTP status code
    Status(u16),
    /// Every attempt failed at transport level; holds the last message
    Error(String),
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Status(code) => write!(f, "HTTP {}", code),
            ProbeOutcome::Error(message) => f.write_str(message),
        }
    }
}

/// A resolved URL paired with the outcome of probing exactly that URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub url: String,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    /// Only an exact 200 counts as a working backlink
    pub fn is_working(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Status(200))
    }
}

/// Sends one GET and reports the status code, or a textual transport error
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<u16, String>;
}

/// The real transport, backed by a shared reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the client once for the whole run
    ///
    /// User-Agent, per-attempt timeout and redirect policy all come from the
    /// config. Redirects are followed up to `max_redirects` hops and the final
    /// status is recorded; with 0 the 30x itself is recorded.
    pub fn new(config: &AuditConfig) -> reqwest::Result<Self> {
        let policy = if config.max_redirects == 0 {
            redirect::Policy::none()
        } else {
            redirect::Policy::limited(config.max_redirects)
        };

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .redirect(policy)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<u16, String> {
        match self.client.get(url).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) => Err(describe_error(&e)),
        }
    }
}

// All transport failures collapse into one category; only the text says
// which kind it was.
fn describe_error(error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    format!("{}: {}", kind, error)
}

/// Probes `url`, retrying transport failures according to `retry`
pub async fn probe<T>(transport: &T, url: &str, retry: RetryPolicy) -> ProbeOutcome
where
    T: Transport + ?Sized,
{
    let mut last_error = String::from("no attempt made");

    for attempt in 1..=retry.attempts {
        let started = Instant::now();

        match transport.get(url).await {
            Ok(code) => {
                debug!(
                    "{} answered {} in {:.2}s",
                    url,
                    code,
                    started.elapsed().as_secs_f64()
                );
                return ProbeOutcome::Status(code);
            }
            Err(message) => {
                warn!("Attempt {}/{} failed for {}: {}", attempt, retry.attempts, url, message);
                last_error = message;

                if attempt < retry.attempts {
                    tokio::time::sleep(retry.backoff).await;
                }
            }
        }
    }

    ProbeOutcome::Error(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::testing::{refused_url, ScriptedTransport, TestServer};
    use std::time::Duration;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            backoff: Duration::from_millis(10),
        }
    }

    fn test_config() -> AuditConfig {
        AuditConfig {
            timeout: Duration::from_secs(5),
            retry: fast_retry(),
            ..AuditConfig::default()
        }
    }

    #[test]
    fn test_only_exact_200_is_working() {
        let result = |outcome| ProbeResult {
            url: "https://example.com".to_string(),
            outcome,
        };
        assert!(result(ProbeOutcome::Status(200)).is_working());
        assert!(!result(ProbeOutcome::Status(204)).is_working());
        assert!(!result(ProbeOutcome::Status(301)).is_working());
        assert!(!result(ProbeOutcome::Error("boom".into())).is_working());
    }

    #[tokio::test]
    async fn test_every_attempt_fails() {
        let transport = ScriptedTransport::new().fail("http://a.test/", 99, "refused");

        let outcome = probe(&transport, "http://a.test/", fast_retry()).await;

        assert_eq!(outcome, ProbeOutcome::Error("refused".to_string()));
        assert_eq!(transport.calls("http://a.test/"), 3);
    }

    #[tokio::test]
    async fn test_success_on_second_attempt() {
        let transport = ScriptedTransport::new()
            .fail("http://a.test/", 1, "dns error")
            .respond("http://a.test/", 200);

        let outcome = probe(&transport, "http://a.test/", fast_retry()).await;

        assert_eq!(outcome, ProbeOutcome::Status(200));
        assert_eq!(transport.calls("http://a.test/"), 2);
    }

    #[tokio::test]
    async fn test_last_error_message_is_kept() {
        let transport = ScriptedTransport::new()
            .fail("http://a.test/", 1, "first")
            .fail("http://a.test/", 1, "second")
            .fail("http://a.test/", 1, "third");

        let outcome = probe(&transport, "http://a.test/", fast_retry()).await;
        assert_eq!(outcome, ProbeOutcome::Error("third".to_string()));
    }

    #[tokio::test]
    async fn test_http_200() {
        let server = TestServer::spawn().await;
        let transport = HttpTransport::new(&test_config()).unwrap();

        let outcome = probe(&transport, &server.url("/status/200"), fast_retry()).await;

        assert_eq!(outcome, ProbeOutcome::Status(200));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_http_404_not_retried() {
        let server = TestServer::spawn().await;
        let transport = HttpTransport::new(&test_config()).unwrap();

        let outcome = probe(&transport, &server.url("/status/404"), fast_retry()).await;

        assert_eq!(outcome, ProbeOutcome::Status(404));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let transport = HttpTransport::new(&test_config()).unwrap();

        let outcome = probe(&transport, &refused_url(), fast_retry()).await;

        match outcome {
            ProbeOutcome::Error(message) => assert!(message.starts_with("connection failed")),
            other => panic!("expected an error outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stalled_server_times_out_on_every_attempt() {
        let server = TestServer::spawn().await;
        let config = AuditConfig {
            timeout: Duration::from_millis(200),
            ..test_config()
        };
        let transport = HttpTransport::new(&config).unwrap();

        let outcome = probe(&transport, &server.url("/stall"), fast_retry()).await;

        match outcome {
            ProbeOutcome::Error(message) => assert!(message.starts_with("timed out")),
            other => panic!("expected an error outcome, got {:?}", other),
        }
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn test_redirect_followed_by_default() {
        let server = TestServer::spawn().await;
        let transport = HttpTransport::new(&test_config()).unwrap();

        let outcome = probe(&transport, &server.url("/redirect"), fast_retry()).await;
        assert_eq!(outcome, ProbeOutcome::Status(200));
    }

    #[tokio::test]
    async fn test_redirect_recorded_when_not_following() {
        let server = TestServer::spawn().await;
        let config = AuditConfig {
            max_redirects: 0,
            ..test_config()
        };
        let transport = HttpTransport::new(&config).unwrap();

        let outcome = probe(&transport, &server.url("/redirect"), fast_retry()).await;
        assert_eq!(outcome, ProbeOutcome::Status(302));
    }
}
