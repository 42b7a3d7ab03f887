//! HTTP client with browser emulation and retry logic
//!
//! Every remote call the resolver makes goes through [`MlwbdClient`]:
//! a reqwest client dressed up as a real browser (rotating user agent,
//! navigation headers, cookie jar) with bounded retries and exponential
//! backoff around each request.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::error::{MlwbdError, Result};

/// Realistic desktop browser identities used for rotation
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:123.0) Gecko/20100101 Firefox/123.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3 Safari/605.1.15",
];

/// Pool of user-agent strings with uniform random selection
///
/// Injected through [`ClientConfig`] so tests can pin a single agent
/// for determinism instead of relying on ambient randomness.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Create a pool from custom agent strings
    pub fn new(agents: Vec<String>) -> Self {
        Self { agents }
    }

    /// Pick one agent uniformly at random, `None` when the pool is empty
    pub fn select(&self) -> Option<&str> {
        if self.agents.is_empty() {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..self.agents.len());
        Some(&self.agents[idx])
    }

    /// Number of agents in the pool
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the pool holds no agents
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self {
            agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-attempt timeout in seconds (default: 45)
    pub timeout_secs: u64,
    /// Retries after the first failed attempt (default: 4)
    pub max_retries: u32,
    /// User agents to rotate through
    pub user_agents: UserAgentPool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 45,
            max_retries: 4,
            user_agents: UserAgentPool::default(),
        }
    }
}

/// Backoff before retry `attempt` (0-based): 2, 4, 8, 16... seconds
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << (attempt + 1))
}

/// HTTP client wrapper used by every hop of the resolver
///
/// One user agent is picked per client; the cookie jar carries upstream
/// session cookies across the hops of a single pipeline invocation.
/// Clients are cheap and never shared between pipeline invocations.
pub struct MlwbdClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl MlwbdClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8"
                        .parse()
                        .unwrap(),
                );
                headers.insert(
                    reqwest::header::ACCEPT_LANGUAGE,
                    "en-US,en;q=0.9".parse().unwrap(),
                );
                headers.insert(
                    reqwest::header::CONNECTION,
                    "keep-alive".parse().unwrap(),
                );
                headers.insert(
                    reqwest::header::UPGRADE_INSECURE_REQUESTS,
                    "1".parse().unwrap(),
                );
                headers.insert("Sec-Fetch-Dest", "document".parse().unwrap());
                headers.insert("Sec-Fetch-Mode", "navigate".parse().unwrap());
                headers.insert("Sec-Fetch-Site", "none".parse().unwrap());
                headers.insert("Sec-Fetch-User", "?1".parse().unwrap());
                headers
            });

        if let Some(agent) = config.user_agents.select() {
            builder = builder.user_agent(agent.to_string());
        }

        let client = builder.build().map_err(MlwbdError::Client)?;

        Ok(Self { client, config })
    }

    /// GET a URL and return the response body
    pub async fn get(&self, url: &str) -> Result<String> {
        self.execute(self.client.get(url), url).await
    }

    /// POST a form-encoded body and return the response body
    ///
    /// `headers` carries per-hop values such as `Referer` and `Origin`.
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<String> {
        let mut request = self.client.post(url).form(form);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.execute(request, url).await
    }

    /// POST a JSON body and return the response body
    pub async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        headers: &[(&str, &str)],
    ) -> Result<String> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.execute(request, url).await
    }

    /// Retrying executor wrapped around a single prepared request
    ///
    /// Runs up to `max_retries + 1` attempts, sleeping 2, 4, 8, 16...
    /// seconds between them. Exhausting the budget returns the last
    /// failure classification.
    async fn execute(&self, request: reqwest::RequestBuilder, url: &str) -> Result<String> {
        let attempts = self.config.max_retries + 1;
        let mut attempt: u32 = 0;

        loop {
            info!("request attempt {}/{} for {}", attempt + 1, attempts, url);

            let prepared = request.try_clone().ok_or_else(|| {
                MlwbdError::RequestFailed(format!("request body for {url} cannot be replayed"))
            })?;

            match self.attempt(prepared, url).await {
                Ok(body) => return Ok(body),
                Err(err) => {
                    if attempt >= self.config.max_retries {
                        error!("giving up on {} after {} attempts: {}", url, attempt + 1, err);
                        return Err(err);
                    }
                    let delay = backoff_delay(attempt);
                    warn!(
                        "attempt {} for {} failed ({}), retrying in {}s",
                        attempt + 1,
                        url,
                        err,
                        delay.as_secs()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Perform one attempt and classify its failure
    async fn attempt(&self, request: reqwest::RequestBuilder, url: &str) -> Result<String> {
        let response = request.send().await.map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MlwbdError::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| classify(e, url))
    }
}

/// Map a transport error onto the resolver's failure taxonomy
fn classify(err: reqwest::Error, url: &str) -> MlwbdError {
    if err.is_timeout() {
        MlwbdError::Timeout(url.to_string())
    } else if err.is_connect() {
        MlwbdError::ConnectionFailed(url.to_string())
    } else {
        MlwbdError::RequestFailed(err.to_string())
    }
}
