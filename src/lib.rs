// src/lib.rs
// =============================================================================
// webmap crawls every reachable page of a single domain and produces a
// sorted site map of the URLs it discovered.
//
// The crawl engine is a fixed pool of async workers sharing a bounded
// backlog of pending pages. Each worker pops a page, streams its links,
// and feeds newly discovered in-domain URLs back into the backlog. An
// outstanding-work tracker detects the moment no worker has work left and
// none can produce any, which closes the backlog and ends the crawl.
//
// Modules:
// - config: crawl configuration and validation
// - error:  the library error type
// - crawl:  site map, link extraction, backlog and the crawler itself
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;

pub use config::CrawlConfig;
pub use crawl::{crawl_domain, DomainCrawler, DomainScope, LinkReader, SiteMap};
pub use error::CrawlError;
