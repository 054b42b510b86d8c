// src/crawl/crawler.rs
// =============================================================================
// The crawl orchestrator and its worker loop.
//
// The orchestrator seeds the backlog with the root URL, spawns a fixed
// pool of workers and waits for the outstanding-work count to drain to
// zero. Each worker pops a page, reads its links, resolves each against
// the page and attempts to admit and queue the new ones. A configured
// deadline flips a shared stopped flag; after that, popped pages are
// marked done without being fetched, so the backlog drains and the
// partial site map is returned as a success.
// =============================================================================

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::CrawlConfig;
use crate::crawl::{Backlog, LinkReader, SiteMap, WorkTracker};
use crate::error::CrawlError;

/// Crawls the domain of `root_url` and returns its site map.
///
/// Fails fast on an unparseable root or an invalid configuration, and
/// fails with [`CrawlError::NoAccess`] when the crawl never managed to
/// read a single link. Every other problem (unreachable pages, malformed
/// links, backlog overflow) is logged and degrades the completeness of
/// the result instead of aborting.
pub async fn crawl_domain(root_url: &str, config: CrawlConfig) -> Result<SiteMap, CrawlError> {
    let root = Url::parse(root_url).map_err(|source| CrawlError::InvalidRootUrl {
        url: root_url.to_string(),
        source,
    })?;

    DomainCrawler::new(root, config)?.crawl().await
}

/// State of one domain crawl.
///
/// A crawler services exactly one crawl: [`DomainCrawler::crawl`] takes
/// the crawler by value, so an instance cannot be reused or shared.
pub struct DomainCrawler {
    root: Url,
    config: CrawlConfig,
    client: Client,
    site_map: SiteMap,
    backlog: Arc<Backlog>,
    tracker: Arc<WorkTracker>,
    stopped: Arc<AtomicBool>,
    accessed_links: Arc<AtomicU64>,
}

impl DomainCrawler {
    /// Validates the configuration and prepares a crawler for the given
    /// root. No network activity happens here.
    pub fn new(root: Url, config: CrawlConfig) -> Result<Self, CrawlError> {
        config.validate()?;

        let client = config.build_client()?;
        let site_map = SiteMap::new(root.clone(), Arc::clone(&config.scope));
        let backlog = Arc::new(Backlog::new(config.max_pending_urls));
        let tracker = Arc::new(WorkTracker::new());

        // Capacity is validated to be at least one, so seeding the empty
        // backlog cannot be rejected.
        backlog.try_push(root.clone());
        tracker.add();

        Ok(DomainCrawler {
            root,
            config,
            client,
            site_map,
            backlog,
            tracker,
            stopped: Arc::new(AtomicBool::new(false)),
            accessed_links: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Runs the crawl to completion (or to the configured deadline) and
    /// returns the site map.
    pub async fn crawl(self) -> Result<SiteMap, CrawlError> {
        let workers: Vec<_> = (0..self.config.max_concurrency)
            .map(|_| tokio::spawn(self.worker().run()))
            .collect();

        // The deadline only flips the stopped flag; pages already being
        // fetched finish naturally and the backlog drains through the
        // skip path in the worker loop.
        let deadline = self.config.crawl_timeout.map(|timeout| {
            let stopped = Arc::clone(&self.stopped);
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                stopped.store(true, Ordering::Relaxed);
            })
        });

        self.tracker.wait().await;
        self.backlog.close();

        for joined in join_all(workers).await {
            if let Err(err) = joined {
                warn!(error = %err, "crawl worker panicked");
            }
        }

        if let Some(deadline) = deadline {
            deadline.abort();
        }

        if self.accessed_links.load(Ordering::Relaxed) == 0 {
            return Err(CrawlError::NoAccess(self.root.to_string()));
        }

        Ok(self.site_map)
    }

    fn worker(&self) -> Worker {
        Worker {
            client: self.client.clone(),
            site_map: self.site_map.clone(),
            backlog: Arc::clone(&self.backlog),
            tracker: Arc::clone(&self.tracker),
            stopped: Arc::clone(&self.stopped),
            accessed_links: Arc::clone(&self.accessed_links),
        }
    }
}

struct Worker {
    client: Client,
    site_map: SiteMap,
    backlog: Arc<Backlog>,
    tracker: Arc<WorkTracker>,
    stopped: Arc<AtomicBool>,
    accessed_links: Arc<AtomicU64>,
}

impl Worker {
    async fn run(self) {
        while let Some(page_url) = self.backlog.pop().await {
            debug!(url = %page_url, "crawling page for links");

            if self.stopped.load(Ordering::Relaxed) {
                debug!(url = %page_url, "skipping page, crawl deadline reached");
            } else {
                self.read_all_links(&page_url).await;
            }

            // Always release the unit, even when the page failed or was
            // skipped, or the termination wait would hang forever.
            self.tracker.done();
        }
    }

    /// Reads every link on the page and feeds the previously unseen
    /// in-domain ones back into the backlog.
    async fn read_all_links(&self, page_url: &Url) {
        let mut reader = LinkReader::new(page_url.clone(), self.client.clone());

        loop {
            let href = match reader.next_link().await {
                Ok(Some(href)) => href,
                Ok(None) => break,
                Err(err) => {
                    warn!(page = %page_url, error = %err, "error reading links from page");
                    break;
                }
            };

            self.accessed_links.fetch_add(1, Ordering::Relaxed);

            // Links are resolved relative to the page they were found
            // on; "?t=0" is rooted in the current path, for example.
            let link = match page_url.join(&href) {
                Ok(link) => link,
                Err(err) => {
                    warn!(page = %page_url, link = %href, error = %err, "error parsing link");
                    continue;
                }
            };

            if self.site_map.admit(&link) {
                debug!(page = %link, "found new page");

                if self.backlog.try_push(link.clone()) {
                    self.tracker.add();
                    debug!(page = %link, "page queued for crawling");
                } else {
                    error!(url = %link, page = %page_url, "backlog full, page will not be crawled");
                }
            }
        }
    }
}
