// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// webmap takes one root URL and crawl tuning flags; everything maps
// directly onto a CrawlConfig in main.rs.
// =============================================================================

use clap::Parser;

use webmap::config::{DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_PENDING_URLS};

#[derive(Parser, Debug)]
#[command(
    name = "webmap",
    version,
    about = "Crawl a domain and print its site map",
    long_about = "webmap crawls every page reachable from the given root URL without \
                  leaving its domain, and prints the sorted list of discovered URLs, \
                  one per line."
)]
pub struct Cli {
    /// Root URL to crawl (e.g. https://example.com)
    pub url: String,

    /// Maximum number of concurrent crawl workers
    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub concurrency: usize,

    /// Maximum number of URLs that may wait in the crawl backlog;
    /// URLs discovered while the backlog is full are dropped
    #[arg(long, default_value_t = DEFAULT_MAX_PENDING_URLS)]
    pub max_pending: usize,

    /// Maximum total crawl time in seconds (0 = crawl to completion);
    /// hitting the deadline prints whatever was discovered so far
    #[arg(short = 'w', long, default_value_t = 0)]
    pub crawl_timeout: u64,

    /// HTTP request timeout in seconds
    #[arg(short = 't', long, default_value_t = 10)]
    pub request_timeout: u64,

    /// HTTP keep-alive for idle connections, in seconds
    #[arg(short = 'k', long, default_value_t = 30)]
    pub keep_alive: u64,

    /// Enable verbose logging (info level) on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub debug: bool,
}
