// src/crawl/sitemap.rs
// =============================================================================
// The site map doubles as the crawl frontier: it records every URL that
// was ever admitted for crawling and renders the final sorted output.
//
// Admission is the single authoritative signal that exactly one worker may
// enqueue a URL. It combines the domain-scope check with a double-checked
// read/write lock over the URL set, so concurrent workers racing on the
// same link observe `true` exactly once between them.
// =============================================================================

use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, RwLock};

use url::Url;

/// Decides whether a discovered link belongs to the crawled domain.
///
/// Custom policies can tighten or loosen the default, for example by also
/// comparing schemes or by resolving hostnames.
pub trait DomainScope: Send + Sync {
    fn in_scope(&self, root: &Url, link: &Url) -> bool;
}

impl<F> DomainScope for F
where
    F: Fn(&Url, &Url) -> bool + Send + Sync,
{
    fn in_scope(&self, root: &Url, link: &Url) -> bool {
        self(root, link)
    }
}

/// The default scope: the link's host (and explicit port, if any) must
/// match the root's. Schemes are intentionally ignored, so an https link
/// on an http site still counts as in-domain.
pub struct SameHost;

impl DomainScope for SameHost {
    fn in_scope(&self, root: &Url, link: &Url) -> bool {
        root.host_str() == link.host_str() && root.port() == link.port()
    }
}

struct SiteMapInner {
    root: Url,
    scope: Arc<dyn DomainScope>,
    urls: RwLock<HashSet<String>>,
}

/// The set of URLs admitted for one crawl.
///
/// `SiteMap` is a cheap handle over shared state; cloning it hands the
/// same underlying set to another worker.
#[derive(Clone)]
pub struct SiteMap {
    inner: Arc<SiteMapInner>,
}

impl fmt::Debug for SiteMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteMap")
            .field("root", &self.inner.root)
            .field(
                "urls",
                &*self.inner.urls.read().expect("site map lock poisoned"),
            )
            .finish()
    }
}

impl SiteMap {
    /// Creates an empty site map anchored at the given root URL.
    pub fn new(root: Url, scope: Arc<dyn DomainScope>) -> Self {
        SiteMap {
            inner: Arc::new(SiteMapInner {
                root,
                scope,
                urls: RwLock::new(HashSet::new()),
            }),
        }
    }

    /// Returns true if the caller should crawl this URL. Once `admit`
    /// returns true for a URL, every later call for the same canonical
    /// string returns false, including calls racing with this one.
    pub fn admit(&self, link: &Url) -> bool {
        if !self.inner.scope.in_scope(&self.inner.root, link) {
            return false;
        }

        let url_string = link.to_string();

        // Most links on a typical page are repeats (navigation bars and
        // the like), so check under the shared read lock first and only
        // take the write lock for genuinely new URLs.
        {
            let urls = self.inner.urls.read().expect("site map lock poisoned");
            if urls.contains(&url_string) {
                return false;
            }
        }

        // The read check and the decision to crawl are not atomic
        // together: another worker may have admitted the same URL in the
        // gap, so the set must be re-checked under the write lock.
        let mut urls = self.inner.urls.write().expect("site map lock poisoned");
        urls.insert(url_string)
    }

    /// Number of URLs admitted so far.
    pub fn len(&self) -> usize {
        self.inner.urls.read().expect("site map lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the site map to `out`, one URL per line in lexicographic
    /// order. The read lock is held only while snapshotting the set.
    pub fn write_map(&self, out: &mut impl Write) -> io::Result<()> {
        let mut urls: Vec<String> = {
            let urls = self.inner.urls.read().expect("site map lock poisoned");
            urls.iter().cloned().collect()
        };
        urls.sort();

        for url in &urls {
            writeln!(out, "{url}")?;
        }

        Ok(())
    }
}
