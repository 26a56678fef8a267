//! Symbol-lookup service client.
//!
//! Wire contract:
//! - `POST {base}/api/v1/auth/anonymous` with `{"accessToken": ..}` returns `{"authToken": ..}`
//! - `GET {base}/api/v1/symbol/lookup?query=..` with a bearer token returns `{"items": [..]}`
//!
//! The token is fetched lazily, reused, and dropped when the service answers
//! 401. Every query gets the same attempt budget from [`RetryConfig`].

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse};
use crate::retry::RetryConfig;
use crate::throttling::LookupThrottle;

/// One candidate returned by the lookup service, in service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupCandidate {
    pub symbol: String,
    pub currency: String,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    items: Vec<LookupCandidate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    access_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    auth_token: String,
}

/// Outcome of a single attempt that did not fail fatally.
enum Step<T> {
    Ready(T),
    Unauthorized,
    Retry(String),
}

pub struct LookupClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    access_token: String,
    token: Mutex<Option<String>>,
    retry: RetryConfig,
    throttle: Option<LookupThrottle>,
    timeout_ms: u64,
}

impl LookupClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            access_token: access_token.into(),
            token: Mutex::new(None),
            retry: RetryConfig::default(),
            throttle: None,
            timeout_ms: 10_000,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_throttle(mut self, throttle: LookupThrottle) -> Self {
        self.throttle = Some(throttle);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Runs one free-text query within the attempt budget.
    pub async fn search(&self, query: &str) -> Result<Vec<LookupCandidate>, RemoteError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut last_failure = Step::Unauthorized;

        for attempt in 0..max_attempts {
            if let Some(throttle) = &self.throttle {
                throttle.wait().await;
            }

            debug!(query, attempt = attempt + 1, "symbol lookup attempt");
            match self.attempt(query).await? {
                Step::Ready(candidates) => return Ok(candidates),
                Step::Unauthorized => {
                    warn!(attempt = attempt + 1, "lookup token rejected, refreshing");
                    self.invalidate_token();
                    last_failure = Step::Unauthorized;
                }
                Step::Retry(message) => {
                    warn!(attempt = attempt + 1, error = %message, "symbol lookup failed");
                    last_failure = Step::Retry(message);
                    if attempt + 1 < max_attempts {
                        tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
                    }
                }
            }
        }

        Err(match last_failure {
            Step::Retry(message) => RemoteError::unavailable(message, max_attempts),
            Step::Unauthorized | Step::Ready(()) => RemoteError::authentication_failed(max_attempts),
        })
    }

    /// Drops the cached bearer token; the next attempt fetches a new one.
    pub fn invalidate_token(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn cached_token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn attempt(&self, query: &str) -> Result<Step<Vec<LookupCandidate>>, RemoteError> {
        let token = match self.cached_token() {
            Some(token) => token,
            None => match self.fetch_token().await? {
                Step::Ready(token) => token,
                Step::Unauthorized => return Ok(Step::Unauthorized),
                Step::Retry(message) => return Ok(Step::Retry(message)),
            },
        };

        let url = format!(
            "{}/api/v1/symbol/lookup?query={}",
            self.base_url,
            urlencoding::encode(query)
        );
        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_auth(&HttpAuth::BearerToken(token))
            .with_timeout_ms(self.timeout_ms);

        let response = match self.execute(request).await? {
            Step::Ready(response) => response,
            Step::Unauthorized => return Ok(Step::Unauthorized),
            Step::Retry(message) => return Ok(Step::Retry(message)),
        };

        if response.is_unauthorized() {
            return Ok(Step::Unauthorized);
        }
        if !response.is_success() {
            return self.status_step(response.status);
        }

        let parsed: LookupResponse = serde_json::from_str(&response.body)
            .map_err(|error| RemoteError::decode(format!("malformed lookup response: {error}")))?;
        Ok(Step::Ready(parsed.items))
    }

    async fn fetch_token(&self) -> Result<Step<String>, RemoteError> {
        let body = serde_json::to_string(&TokenRequest {
            access_token: &self.access_token,
        })
        .map_err(|error| RemoteError::decode(format!("cannot encode token request: {error}")))?;
        let request = HttpRequest::post(format!("{}/api/v1/auth/anonymous", self.base_url))
            .with_json_body(body)
            .with_timeout_ms(self.timeout_ms);

        let response = match self.execute(request).await? {
            Step::Ready(response) => response,
            Step::Unauthorized => return Ok(Step::Unauthorized),
            Step::Retry(message) => return Ok(Step::Retry(message)),
        };

        if response.status == 401 || response.status == 403 {
            return Err(RemoteError::unauthorized(
                "lookup service rejected the access token",
            ));
        }
        if !response.is_success() {
            return self.status_step(response.status);
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|error| RemoteError::decode(format!("malformed token response: {error}")))?;
        debug!("lookup token issued");
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(parsed.auth_token.clone());
        Ok(Step::Ready(parsed.auth_token))
    }

    async fn execute(&self, request: HttpRequest) -> Result<Step<HttpResponse>, RemoteError> {
        match self.http.execute(request).await {
            Ok(response) => Ok(Step::Ready(response)),
            Err(error) if error.retryable() => Ok(Step::Retry(format!(
                "lookup transport error: {}",
                error.message()
            ))),
            Err(error) => Err(RemoteError::unavailable(
                format!("lookup transport error: {}", error.message()),
                1,
            )),
        }
    }

    fn status_step<T>(&self, status: u16) -> Result<Step<T>, RemoteError> {
        if self.retry.should_retry_status(status) {
            Ok(Step::Retry(format!("lookup service returned status {status}")))
        } else {
            Err(RemoteError::status(status))
        }
    }
}

impl std::fmt::Debug for LookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}
