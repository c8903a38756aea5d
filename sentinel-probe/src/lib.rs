//! Probe Executor: issues one bounded HTTP GET per website and reports the
//! outcome as a `ProbeOutcome`, never as a thrown error — a transport
//! failure is itself a signal (`status_code = 0`), not an exceptional path.

mod metrics;

pub use metrics::ProbeMetrics;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub status_code: u32,
    pub latency_ms: u32,
    pub error_message: Option<String>,
}

#[async_trait]
pub trait ProbeExecutor: Send + Sync {
    async fn probe(&self, url: &str) -> Result<ProbeOutcome>;
}

/// Prepends `https://` when the given URL carries no scheme, so operators
/// can register bare hostnames (`example.com`) as well as full URLs.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

pub struct HttpProbeExecutor {
    client: reqwest::Client,
    timeout: Duration,
    metrics: ProbeMetrics,
}

impl HttpProbeExecutor {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )
            .build()
            .expect("reqwest client builder should never fail with static config");
        Self {
            client,
            timeout,
            metrics: ProbeMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &ProbeMetrics {
        &self.metrics
    }
}

#[async_trait]
impl ProbeExecutor for HttpProbeExecutor {
    async fn probe(&self, url: &str) -> Result<ProbeOutcome> {
        let target = normalize_url(url);
        let started = Instant::now();

        let outcome = match self
            .client
            .get(&target)
            .timeout(self.timeout)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
        {
            Ok(response) => ProbeOutcome {
                status_code: response.status().as_u16() as u32,
                latency_ms: started.elapsed().as_millis() as u32,
                error_message: None,
            },
            Err(err) => ProbeOutcome {
                status_code: 0,
                latency_ms: started.elapsed().as_millis() as u32,
                error_message: Some(err.to_string()),
            },
        };

        self.metrics
            .record_probe(outcome.latency_ms as u64, outcome.status_code == 0);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn normalize_url_adds_scheme_when_missing() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[tokio::test]
    async fn probe_reports_status_code_and_latency() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let executor = HttpProbeExecutor::new(Duration::from_secs(5));
        let outcome = executor.probe(&mock_server.uri()).await.unwrap();

        assert_eq!(outcome.status_code, 200);
        assert!(outcome.error_message.is_none());
        assert_eq!(executor.metrics().total_probes(), 1);
        assert_eq!(executor.metrics().failed_probes(), 0);
    }

    #[tokio::test]
    async fn probe_reports_zero_status_on_transport_failure() {
        let executor = HttpProbeExecutor::new(Duration::from_millis(50));
        // nothing listens here; the connection should fail fast.
        let outcome = executor.probe("http://127.0.0.1:1").await.unwrap();

        assert_eq!(outcome.status_code, 0);
        assert!(outcome.error_message.is_some());
        assert_eq!(executor.metrics().failed_probes(), 1);
    }
}
