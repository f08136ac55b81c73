//! Resilient HTTP GET with browser identity, politeness delay and retry.
//!
//! This module provides the only network entry point of the scraper. It is
//! built from two small seams so the retry loop can be exercised without a
//! network or a real clock:
//! - [`Transport`]: performs exactly one HTTP attempt ([`ReqwestTransport`] in production)
//! - [`Delay`]: sleeps for a given duration ([`TokioDelay`] in production)
//! - [`Fetcher`]: the attempt-budget loop over a transport and a delay
//!
//! # Retry Strategy
//!
//! - Before every attempt, including the first: sleep `base_delay + U[0, 2s)`
//! - After a failed attempt with budget left: sleep `base_delay * (attempt + 1)`
//! - After the last failed attempt: return [`FetchError::Exhausted`] wrapping the last error

use crate::error::FetchError;
use crate::models::{RawDocument, SourceSpec};
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};

/// Upper bound (exclusive) of the random part of the politeness delay.
const JITTER_NANOS: u64 = 2_000_000_000;

/// Browser identity sent with every request unless a source overrides it.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "fr,fr-FR;q=0.8,en-US;q=0.5,en;q=0.3"),
    ("Connection", "keep-alive"),
    ("Cache-Control", "no-cache"),
    ("Pragma", "no-cache"),
];

/// How a single logical fetch is performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Total number of attempts; `0` is treated as `1`.
    pub max_attempts: u32,
    /// Base of both the politeness delay and the retry backoff.
    pub base_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
    pub verify_tls: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            timeout: Duration::from_secs(10),
            headers: owned_headers(DEFAULT_HEADERS),
            verify_tls: true,
        }
    }
}

impl FetchPolicy {
    /// The policy to use for `spec`, with its custom headers applied if it has any.
    pub fn for_source(&self, spec: &SourceSpec) -> FetchPolicy {
        match spec.headers {
            Some(headers) => FetchPolicy {
                headers: owned_headers(headers),
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

fn owned_headers(headers: &[(&str, &str)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Pause taken before every attempt: `base + U[0, 2s)`.
pub fn politeness_delay(base: Duration) -> Duration {
    base + Duration::from_nanos(rng().random_range(0..JITTER_NANOS))
}

/// Extra pause after failed attempt number `attempt_index` (zero-based).
pub fn retry_backoff(base: Duration, attempt_index: u32) -> Duration {
    base.saturating_mul(attempt_index.saturating_add(1))
}

/// One HTTP GET attempt.
///
/// Implementations send `policy.headers`, honour `policy.timeout` and
/// `policy.verify_tls`, and return `Ok` only for a 2xx response whose body was read.
pub trait Transport {
    async fn get(&self, url: &str, policy: &FetchPolicy) -> Result<RawDocument, FetchError>;
}

/// A blocking pause in the fetch loop.
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

/// [`Delay`] backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// [`Transport`] backed by two shared `reqwest` clients.
///
/// Certificate checking is a client-level setting in `reqwest`, so one client
/// verifies certificates and the other accepts invalid ones; each request picks
/// the client matching its policy.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    strict: reqwest::Client,
    insecure: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            strict: reqwest::Client::builder().build()?,
            insecure: reqwest::Client::builder()
                .danger_accept_invalid_certs(true)
                .build()?,
        })
    }

    fn client(&self, verify_tls: bool) -> &reqwest::Client {
        if verify_tls { &self.strict } else { &self.insecure }
    }
}

impl Transport for ReqwestTransport {
    #[instrument(level = "debug", skip(self, policy), fields(verify_tls = policy.verify_tls))]
    async fn get(&self, url: &str, policy: &FetchPolicy) -> Result<RawDocument, FetchError> {
        let mut request = self
            .client(policy.verify_tls)
            .get(url)
            .timeout(policy.timeout);
        for (name, value) in &policy.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { url: url.to_string() }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(RawDocument {
            url: url.to_string(),
            status: status.as_u16(),
            body: body.to_vec(),
            headers: response_headers,
        })
    }
}

/// Attempt-budget loop over a [`Transport`] and a [`Delay`].
pub struct Fetcher<T, D = TokioDelay> {
    transport: T,
    delay: D,
}

impl<T, D> Fetcher<T, D>
where
    T: Transport,
    D: Delay,
{
    pub fn new(transport: T, delay: D) -> Self {
        Self { transport, delay }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Fetch `url`, making exactly `policy.max_attempts` attempts before giving up.
    ///
    /// Every attempt is preceded by the politeness delay; a failed attempt with
    /// budget left is followed by the linear backoff.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL to GET.
    /// * `policy` - Attempt budget, delays, timeout, headers and TLS verification,
    ///   all handed to the transport on every attempt.
    ///
    /// # Returns
    ///
    /// The first successful [`RawDocument`].
    ///
    /// # Errors
    ///
    /// [`FetchError::Exhausted`] carrying the error of the final attempt.
    #[instrument(level = "info", skip(self, policy), fields(max_attempts = policy.max_attempts))]
    pub async fn fetch(&self, url: &str, policy: &FetchPolicy) -> Result<RawDocument, FetchError> {
        let total_t0 = Instant::now();
        let attempts = policy.max_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            self.delay.sleep(politeness_delay(policy.base_delay)).await;

            let attempt_t0 = Instant::now();
            match self.transport.get(url, policy).await {
                Ok(document) => {
                    debug!(
                        attempt = attempt + 1,
                        status = document.status,
                        content_type = document.header("content-type").unwrap_or("-"),
                        bytes = document.body.len(),
                        elapsed_ms_total = total_t0.elapsed().as_millis(),
                        "fetch succeeded"
                    );
                    return Ok(document);
                }
                Err(e) => {
                    attempt += 1;
                    let elapsed_ms_attempt = attempt_t0.elapsed().as_millis();

                    if attempt >= attempts {
                        error!(
                            attempt,
                            max = attempts,
                            elapsed_ms_attempt,
                            elapsed_ms_total = total_t0.elapsed().as_millis(),
                            error = %e,
                            "fetch exhausted retries"
                        );
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts,
                            last: Box::new(e),
                        });
                    }

                    let backoff = retry_backoff(policy.base_delay, attempt - 1);
                    warn!(
                        attempt,
                        max = attempts,
                        elapsed_ms_attempt,
                        ?backoff,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    self.delay.sleep(backoff).await;
                }
            }
        }
    }
}

impl<T, D> fmt::Debug for Fetcher<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher").finish_non_exhaustive()
    }
}
