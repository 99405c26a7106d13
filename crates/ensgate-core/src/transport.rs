//! Endpoint and fallback transports.
//!
//! An [`EndpointTransport`] owns one provider URL and spends its retry budget
//! there. A [`FallbackTransport`] walks its endpoints strictly in order and
//! only moves on once the current endpoint has exhausted its budget, so the
//! worst-case latency is the sum of every endpoint's `timeout x attempts`.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{EndpointFailure, TransportError};
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::ProviderUrls;
use crate::retry::RetryConfig;

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, TransportError>> + Send + 'a>>;

/// Request/response transport carrying serialized JSON-RPC payloads.
pub trait RpcTransport: Send + Sync {
    fn send<'a>(&'a self, body: String) -> TransportFuture<'a>;
}

/// Timeout, retry budget and headers for one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportPolicy {
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub headers: BTreeMap<String, String>,
}

impl Default for TransportPolicy {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            String::from("content-type"),
            String::from("application/json"),
        );

        Self {
            timeout: Duration::from_millis(10_000),
            retry: RetryConfig::default(),
            headers,
        }
    }
}

impl TransportPolicy {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Transport bound to a single provider URL.
#[derive(Clone)]
pub struct EndpointTransport {
    url: String,
    policy: TransportPolicy,
    http: Arc<dyn HttpClient>,
}

impl EndpointTransport {
    pub fn new(
        url: impl Into<String>,
        policy: TransportPolicy,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            url: url.into(),
            policy,
            http,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send_with_retry(&self, body: String) -> Result<String, TransportError> {
        let retry = &self.policy.retry;
        let attempts = retry.total_attempts();
        let mut last_reason = String::from("no attempt made");

        for attempt in 1..=attempts {
            if attempt > 1 {
                let delay = retry.delay_for_retry(attempt - 2);
                warn!(
                    endpoint = %self.url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    reason = %last_reason,
                    "retrying provider request"
                );
                tokio::time::sleep(delay).await;
            }

            debug!(endpoint = %self.url, attempt, "sending provider request");
            let request = HttpRequest::post(self.url.as_str(), body.clone())
                .with_headers(&self.policy.headers)
                .with_timeout(self.policy.timeout);

            let outcome =
                tokio::time::timeout(self.policy.timeout, self.http.execute(request)).await;

            let retryable = match outcome {
                Err(_) => {
                    last_reason = format!(
                        "request timeout after {} ms",
                        self.policy.timeout.as_millis()
                    );
                    true
                }
                Ok(Ok(response)) if response.is_success() => return Ok(response.body),
                Ok(Ok(response)) => {
                    last_reason = format!("upstream returned status {}", response.status);
                    retry.should_retry_status(response.status)
                }
                Ok(Err(error)) => {
                    last_reason = error.message().to_owned();
                    error.retryable()
                }
            };

            if !retryable {
                return Err(self.failure(attempt, last_reason));
            }
        }

        Err(self.failure(attempts, last_reason))
    }

    fn failure(&self, attempts: u32, reason: String) -> TransportError {
        TransportError::Endpoint(EndpointFailure {
            url: self.url.clone(),
            attempts,
            reason,
        })
    }
}

impl RpcTransport for EndpointTransport {
    fn send<'a>(&'a self, body: String) -> TransportFuture<'a> {
        Box::pin(self.send_with_retry(body))
    }
}

/// Ordered fallback over endpoint transports.
///
/// Holds no memory between calls: every call starts at endpoint 0.
#[derive(Clone)]
pub struct FallbackTransport {
    transports: Vec<EndpointTransport>,
}

impl FallbackTransport {
    pub fn new(urls: &ProviderUrls, policy: &TransportPolicy, http: Arc<dyn HttpClient>) -> Self {
        let transports = urls
            .iter()
            .map(|url| EndpointTransport::new(url, policy.clone(), Arc::clone(&http)))
            .collect();
        Self { transports }
    }

    pub fn from_transports(transports: Vec<EndpointTransport>) -> Self {
        Self { transports }
    }

    async fn send_in_order(&self, body: String) -> Result<String, TransportError> {
        if self.transports.is_empty() {
            return Err(TransportError::NoEndpoints);
        }

        let mut failures = Vec::with_capacity(self.transports.len());

        for (index, transport) in self.transports.iter().enumerate() {
            match transport.send_with_retry(body.clone()).await {
                Ok(response) => {
                    if index > 0 {
                        info!(
                            endpoint = transport.url(),
                            failed_endpoints = failures.len(),
                            "provider fallback succeeded"
                        );
                    }
                    return Ok(response);
                }
                Err(error) => {
                    let next = self.transports.get(index + 1).map(EndpointTransport::url);
                    warn!(
                        endpoint = transport.url(),
                        next = next.unwrap_or("none"),
                        error = %error,
                        "provider failed"
                    );
                    failures.extend_from_slice(error.failures());
                }
            }
        }

        Err(TransportError::Exhausted { failures })
    }
}

impl RpcTransport for FallbackTransport {
    fn send<'a>(&'a self, body: String) -> TransportFuture<'a> {
        Box::pin(self.send_in_order(body))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::http_client::{HttpError, HttpFuture, HttpResponse};

    /// Replies per URL from a fixed script; the last entry repeats.
    struct ScriptedHttp {
        scripts: HashMap<String, Vec<Result<HttpResponse, HttpError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedHttp {
        fn new(scripts: Vec<(&str, Vec<Result<HttpResponse, HttpError>>)>) -> Self {
            Self {
                scripts: scripts
                    .into_iter()
                    .map(|(url, script)| (url.to_owned(), script))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    impl HttpClient for ScriptedHttp {
        fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
            Box::pin(async move {
                let mut calls = self.calls.lock().expect("calls lock");
                let seen = calls.iter().filter(|url| **url == request.url).count();
                calls.push(request.url.clone());
                drop(calls);

                let script = self
                    .scripts
                    .get(&request.url)
                    .expect("every url is scripted");
                script[seen.min(script.len() - 1)].clone()
            })
        }
    }

    fn fast_policy(max_retries: u32) -> TransportPolicy {
        TransportPolicy::default().with_retry(RetryConfig::fixed(Duration::ZERO, max_retries))
    }

    #[tokio::test]
    async fn endpoint_retries_then_succeeds() {
        let http = Arc::new(ScriptedHttp::new(vec![(
            "https://a.example",
            vec![
                Err(HttpError::new("connection failed")),
                Ok(HttpResponse::with_status(503, "")),
                Ok(HttpResponse::ok_json("{\"ok\":true}")),
            ],
        )]));
        let transport = EndpointTransport::new("https://a.example", fast_policy(3), http.clone());

        let body = transport.send(String::from("{}")).await.expect("third attempt wins");

        assert_eq!(body, "{\"ok\":true}");
        assert_eq!(http.calls().len(), 3);
    }

    #[tokio::test]
    async fn endpoint_stops_on_non_retryable_status() {
        let http = Arc::new(ScriptedHttp::new(vec![(
            "https://a.example",
            vec![Ok(HttpResponse::with_status(400, "bad"))],
        )]));
        let transport = EndpointTransport::new("https://a.example", fast_policy(3), http.clone());

        let error = transport.send(String::from("{}")).await.expect_err("400 is final");

        assert_eq!(http.calls().len(), 1);
        assert_eq!(error.failures()[0].attempts, 1);
        assert!(error.failures()[0].reason.contains("status 400"));
    }

    #[tokio::test]
    async fn fallback_walks_endpoints_in_order() {
        let http = Arc::new(ScriptedHttp::new(vec![
            ("https://a.example", vec![Err(HttpError::new("fetch failed"))]),
            ("https://b.example", vec![Ok(HttpResponse::with_status(502, ""))]),
            ("https://c.example", vec![Ok(HttpResponse::ok_json("\"c\""))]),
        ]));
        let urls =
            ProviderUrls::resolve(Some("https://a.example,https://b.example,https://c.example"));
        let transport = FallbackTransport::new(&urls, &fast_policy(1), http.clone());

        let body = transport.send(String::from("{}")).await.expect("c answers");

        assert_eq!(body, "\"c\"");
        assert_eq!(
            http.calls(),
            vec![
                "https://a.example",
                "https://a.example",
                "https://b.example",
                "https://b.example",
                "https://c.example",
            ]
        );
    }

    #[tokio::test]
    async fn fallback_starts_from_first_endpoint_on_every_call() {
        let http = Arc::new(ScriptedHttp::new(vec![
            ("https://a.example", vec![Err(HttpError::new("down"))]),
            ("https://b.example", vec![Ok(HttpResponse::ok_json("1"))]),
        ]));
        let urls = ProviderUrls::resolve(Some("https://a.example,https://b.example"));
        let transport = FallbackTransport::new(&urls, &fast_policy(0), http.clone());

        transport.send(String::from("{}")).await.expect("first call");
        transport.send(String::from("{}")).await.expect("second call");

        assert_eq!(
            http.calls(),
            vec![
                "https://a.example",
                "https://b.example",
                "https://a.example",
                "https://b.example",
            ]
        );
    }

    #[tokio::test]
    async fn slow_endpoint_hits_the_policy_timeout() {
        struct Stalled;

        impl HttpClient for Stalled {
            fn execute<'a>(&'a self, _request: HttpRequest) -> HttpFuture<'a> {
                Box::pin(async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(HttpResponse::ok_json("late"))
                })
            }
        }

        let policy = fast_policy(0).with_timeout(Duration::from_millis(10));
        let transport = EndpointTransport::new("https://slow.example", policy, Arc::new(Stalled));

        let error = transport.send(String::from("{}")).await.expect_err("times out");

        assert!(error.failures()[0].reason.contains("timeout"));
    }

    #[tokio::test]
    async fn empty_fallback_reports_no_endpoints() {
        let transport = FallbackTransport::from_transports(Vec::new());

        let error = transport.send(String::from("{}")).await.expect_err("nothing to call");

        assert_eq!(error, TransportError::NoEndpoints);
    }

    #[test]
    fn default_policy_matches_provider_budget() {
        let policy = TransportPolicy::default();

        assert_eq!(policy.timeout, Duration::from_millis(10_000));
        assert_eq!(policy.retry.max_retries, 3);
        assert_eq!(policy.retry.delay_for_retry(0), Duration::from_millis(1_000));
        assert_eq!(
            policy.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }
}
