// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Mirrors the knobs of the crawl engine: worker count, backlog capacity,
// an optional whole-crawl deadline, HTTP client timeouts, an optional
// custom client and the domain-scope policy. Validation happens before
// any network activity so a bad configuration fails fast.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use reqwest::{redirect, Client};

use crate::crawl::{DomainScope, SameHost};
use crate::error::CrawlError;

/// Default number of crawl workers. Also sizes the connection pool of the
/// default HTTP client so every worker can hold a connection.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Default backlog capacity. Bounds the pending URL queue so that sites
/// generating dynamic links on every load cannot grow it without limit.
pub const DEFAULT_MAX_PENDING_URLS: usize = 8192;

/// Default per-request timeout for the default HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default keep-alive for idle pooled connections.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Configuration for one domain crawl.
#[derive(Clone)]
pub struct CrawlConfig {
    /// Number of concurrent crawl workers. Must be greater than zero.
    pub max_concurrency: usize,

    /// Maximum number of URLs that may wait in the backlog. Must be
    /// greater than zero. URLs discovered while the backlog is full are
    /// dropped and logged, never retried.
    pub max_pending_urls: usize,

    /// Maximum total crawl time. `None` crawls to completion. When the
    /// deadline fires, pages still in the backlog are drained without
    /// being fetched and the partial site map is returned as a success.
    pub crawl_timeout: Option<Duration>,

    /// Request timeout applied to the default HTTP client.
    pub request_timeout: Duration,

    /// Idle connection keep-alive applied to the default HTTP client.
    pub keep_alive: Duration,

    /// Custom HTTP client. The client must not follow redirects itself:
    /// the crawler treats a 3xx response as a discovered link so that
    /// redirect targets pass through the domain-scope check. When `None`
    /// a suitable client is built from the fields above.
    pub client: Option<Client>,

    /// Policy deciding whether a discovered URL belongs to the crawled
    /// domain. Defaults to comparing the host component of the URLs.
    pub scope: Arc<dyn DomainScope>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_pending_urls: DEFAULT_MAX_PENDING_URLS,
            crawl_timeout: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            keep_alive: DEFAULT_KEEP_ALIVE,
            client: None,
            scope: Arc::new(SameHost),
        }
    }
}

impl CrawlConfig {
    /// Checks the configuration for validation issues.
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.max_concurrency == 0 {
            return Err(CrawlError::Config(
                "max_concurrency must be greater than 0".into(),
            ));
        }

        if self.max_pending_urls == 0 {
            return Err(CrawlError::Config(
                "max_pending_urls must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Returns the configured client, or builds the default one with
    /// redirect following disabled and a pool sized to the worker count.
    pub fn build_client(&self) -> Result<Client, reqwest::Error> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(self.request_timeout)
            .pool_idle_timeout(self.keep_alive)
            .pool_max_idle_per_host(self.max_concurrency)
            .build()
    }
}
