// src/error.rs
// =============================================================================
// Errors that can abort a whole crawl.
//
// Only two conditions are fatal: a configuration problem detected before
// any network activity, and a root that never produced a single link.
// Everything else (bad hrefs, failed pages, backlog overflow) is logged
// and recovered inside the crawl.
// =============================================================================

use thiserror::Error;

/// Errors returned by [`crate::crawl_domain`].
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The root URL string could not be parsed as an absolute URL.
    #[error("invalid root url {url:?}: {source}")]
    InvalidRootUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The configuration failed validation before the crawl started.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The default HTTP client could not be constructed.
    #[error("error building http client: {0}")]
    Client(#[from] reqwest::Error),

    /// The crawl finished without ever reading a link, meaning the root
    /// itself was unreachable and nothing was discovered.
    #[error("unable to access url {0}")]
    NoAccess(String),
}
