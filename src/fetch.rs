use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Header the sources expect; some of them serve bot-detection pages to the
/// default reqwest agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("non-success status {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("unable to read response body for {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Async retrieval used by the cooperative crawls. Transport failures are
/// logged here and surfaced as `None`; nothing past this layer sees them.
#[async_trait]
pub trait HtmlFetch: Send + Sync {
    async fn get_html(&self, url: &str) -> Option<String>;
    async fn get_bytes(&self, url: &str) -> Option<Vec<u8>>;
}

/// Blocking counterpart used by the worker-pool crawl.
pub trait BlockingHtmlFetch: Send + Sync {
    fn get_html(&self, url: &str) -> Option<String>;
    fn get_bytes(&self, url: &str) -> Option<Vec<u8>>;
}

pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    async fn try_get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HtmlFetch for Fetcher {
    async fn get_html(&self, url: &str) -> Option<String> {
        let result = match self.try_get(url).await {
            Ok(response) => response.text().await.map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            }),
            Err(err) => Err(err),
        };
        match result {
            Ok(html) => Some(html),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }

    async fn get_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let result = match self.try_get(url).await {
            Ok(response) => response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|source| FetchError::Body {
                    url: url.to_string(),
                    source,
                }),
            Err(err) => Err(err),
        };
        match result {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }
}

pub struct BlockingFetcher {
    client: reqwest::blocking::Client,
}

impl BlockingFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    fn try_get(&self, url: &str) -> Result<reqwest::blocking::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

impl BlockingHtmlFetch for BlockingFetcher {
    fn get_html(&self, url: &str) -> Option<String> {
        let result = match self.try_get(url) {
            Ok(response) => response.text().map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            }),
            Err(err) => Err(err),
        };
        match result {
            Ok(html) => Some(html),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }

    fn get_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let result = match self.try_get(url) {
            Ok(response) => response
                .bytes()
                .map(|b| b.to_vec())
                .map_err(|source| FetchError::Body {
                    url: url.to_string(),
                    source,
                }),
            Err(err) => Err(err),
        };
        match result {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }
}
