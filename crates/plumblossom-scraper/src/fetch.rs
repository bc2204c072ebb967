use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use plumblossom_lib::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Added to the solve budget for the resolver's own HTTP round trip
const RESOLVER_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub via_challenge_bypass: bool,
    pub timeout: Duration,
}

impl FetchOptions {
    pub fn direct(timeout: Duration) -> Self {
        Self {
            via_challenge_bypass: false,
            timeout,
        }
    }

    pub fn bypass(timeout: Duration) -> Self {
        Self {
            via_challenge_bypass: true,
            timeout,
        }
    }
}

/// Retrieves raw markup. Implementations never retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, opts: FetchOptions) -> Result<String>;
}

/// Something able to get past a bot challenge and hand back the solved document.
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    async fn solve(&self, url: &str, timeout: Duration) -> Result<String>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    solver: Arc<dyn ChallengeSolver>,
}

impl HttpFetcher {
    pub fn new(solver: Arc<dyn ChallengeSolver>) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(DEFAULT_USER_AGENT)
            .cookie_store(true)
            .brotli(true)
            .deflate(true)
            .gzip(true)
            .build()
            .map_err(|e| Error::Request(format!("failed to build http client: {e}")))?;

        Ok(Self { client, solver })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, opts: FetchOptions) -> Result<String> {
        if opts.via_challenge_bypass {
            return self.solver.solve(url, opts.timeout).await;
        }

        debug!("GET {url}");
        let res = self
            .client
            .get(url)
            .timeout(opts.timeout)
            .send()
            .await
            .map_err(|e| request_error(url, opts.timeout, e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        res.text()
            .await
            .map_err(|e| request_error(url, opts.timeout, e))
    }
}

fn request_error(url: &str, timeout: Duration, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        Error::Request(format!("{url}: {e}"))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveRequest<'a> {
    cmd: &'a str,
    url: &'a str,
    max_timeout: u64,
}

#[derive(Debug, Deserialize)]
struct SolveResponse {
    status: String,
    #[serde(default)]
    message: String,
    solution: Option<Solution>,
}

#[derive(Debug, Deserialize)]
struct Solution {
    #[serde(default)]
    status: u16,
    response: String,
}

/// Client for a FlareSolverr instance
#[derive(Clone)]
pub struct FlareSolverr {
    client: reqwest::Client,
    endpoint: String,
}

impl FlareSolverr {
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn error(&self, url: &str, timeout: Duration, e: reqwest::Error) -> Error {
        if e.is_connect() {
            Error::ResolverUnavailable {
                endpoint: self.endpoint.clone(),
            }
        } else if e.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else {
            Error::Resolver(e.to_string())
        }
    }
}

#[async_trait]
impl ChallengeSolver for FlareSolverr {
    async fn solve(&self, url: &str, timeout: Duration) -> Result<String> {
        info!("solving challenge for {url}, waiting up to {}s", timeout.as_secs());

        let req = SolveRequest {
            cmd: "request.get",
            url,
            max_timeout: timeout.as_millis() as u64,
        };

        let res = self
            .client
            .post(&self.endpoint)
            .timeout(timeout + RESOLVER_GRACE)
            .json(&req)
            .send()
            .await
            .map_err(|e| self.error(url, timeout, e))?;

        let body: SolveResponse = res.json().await.map_err(|e| self.error(url, timeout, e))?;

        match body {
            SolveResponse {
                status,
                solution: Some(solution),
                ..
            } if status == "ok" => {
                debug!(
                    "challenge solved for {url}: status {}, {} chars",
                    solution.status,
                    solution.response.len()
                );
                Ok(solution.response)
            }
            SolveResponse { message, .. } => Err(Error::Resolver(message)),
        }
    }
}
