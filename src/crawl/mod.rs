// src/crawl/mod.rs
// =============================================================================
// The crawl engine.
//
// Submodules:
// - sitemap: deduplicating, domain-filtered set of discovered URLs
// - links:   per-page link extraction over an HTTP response
// - backlog: bounded pending-URL queue and outstanding-work tracking
// - crawler: the orchestrator that ties the worker pool together
// =============================================================================

mod backlog;
mod crawler;
mod links;
mod sitemap;

pub use crawler::{crawl_domain, DomainCrawler};
pub use links::{ExtractError, LinkReader};
pub use sitemap::{DomainScope, SameHost, SiteMap};

pub(crate) use backlog::{Backlog, WorkTracker};
