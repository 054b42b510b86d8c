// src/crawl/backlog.rs
// =============================================================================
// The backlog of pages waiting to be crawled, and the tracker that knows
// when the crawl is finished.
//
// The backlog push never blocks: when the queue is full the URL is
// rejected and permanently dropped. If pushes blocked instead, every
// worker could end up blocked pushing while none were left popping, and
// the crawl would deadlock.
//
// The tracker counts outstanding work units: one per URL ever queued,
// released when that URL's full processing completes. The count hitting
// zero is the one and only termination condition — an empty queue proves
// nothing while a worker is still mid-page and able to produce more work.
// =============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::{Notify, Semaphore};
use url::Url;

/// Fixed-capacity FIFO of pending page URLs, shared by all workers.
pub(crate) struct Backlog {
    queue: Mutex<VecDeque<Url>>,
    capacity: usize,
    // One permit per queued URL. Closing the semaphore wakes every
    // blocked popper, which is how queue closure is broadcast.
    ready: Semaphore,
}

impl Backlog {
    pub(crate) fn new(capacity: usize) -> Self {
        Backlog {
            queue: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
            ready: Semaphore::new(0),
        }
    }

    /// Attempts to queue a URL without blocking. Returns false when the
    /// backlog is at capacity or closed; the URL is then dropped for the
    /// rest of the crawl.
    pub(crate) fn try_push(&self, url: Url) -> bool {
        if self.ready.is_closed() {
            return false;
        }

        let mut queue = self.queue.lock().expect("backlog lock poisoned");
        if queue.len() >= self.capacity {
            return false;
        }
        queue.push_back(url);
        drop(queue);

        self.ready.add_permits(1);
        true
    }

    /// Waits for the next pending URL. Returns `None` once the backlog
    /// has been closed.
    pub(crate) async fn pop(&self) -> Option<Url> {
        match self.ready.acquire().await {
            Ok(permit) => {
                permit.forget();
                self.queue.lock().expect("backlog lock poisoned").pop_front()
            }
            // Closed: the crawl is over.
            Err(_) => None,
        }
    }

    /// Closes the backlog, releasing every blocked [`Backlog::pop`].
    /// Called once, after outstanding work reaches zero — at which point
    /// the queue is necessarily empty.
    pub(crate) fn close(&self) {
        self.ready.close();
    }
}

/// Counts outstanding work units and lets the orchestrator block until
/// every queued URL has been fully processed.
pub(crate) struct WorkTracker {
    outstanding: AtomicUsize,
    zero: Notify,
}

impl WorkTracker {
    pub(crate) fn new() -> Self {
        WorkTracker {
            outstanding: AtomicUsize::new(0),
            zero: Notify::new(),
        }
    }

    /// Registers one unit of outstanding work. Called when a URL is
    /// accepted into the backlog, including the seed.
    pub(crate) fn add(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    /// Releases one unit of outstanding work. Called exactly once per
    /// popped URL, whether or not its processing succeeded.
    pub(crate) fn done(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.zero.notify_waiters();
        }
    }

    /// Waits until the outstanding count reaches zero. New units are only
    /// ever added by workers that themselves hold a unit, so zero is
    /// final once reached.
    pub(crate) async fn wait(&self) {
        loop {
            // Register for the notification before re-reading the count,
            // so a release landing in between is not missed.
            let notified = self.zero.notified();
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn url(path: &str) -> Url {
        Url::parse(&format!("http://example.com{path}")).unwrap()
    }

    #[tokio::test]
    async fn push_then_pop_is_fifo() {
        let backlog = Backlog::new(4);
        assert!(backlog.try_push(url("/a")));
        assert!(backlog.try_push(url("/b")));

        assert_eq!(backlog.pop().await, Some(url("/a")));
        assert_eq!(backlog.pop().await, Some(url("/b")));
    }

    #[tokio::test]
    async fn push_beyond_capacity_is_rejected() {
        let backlog = Backlog::new(2);
        assert!(backlog.try_push(url("/a")));
        assert!(backlog.try_push(url("/b")));
        assert!(!backlog.try_push(url("/c")));

        // Popping frees a slot again.
        assert_eq!(backlog.pop().await, Some(url("/a")));
        assert!(backlog.try_push(url("/c")));
    }

    #[tokio::test]
    async fn pop_unblocks_on_close() {
        let backlog = Arc::new(Backlog::new(1));

        let waiter = {
            let backlog = Arc::clone(&backlog);
            tokio::spawn(async move { backlog.pop().await })
        };

        // Give the popper a chance to block before closing.
        tokio::task::yield_now().await;
        backlog.close();

        let popped = timeout(Duration::from_secs(1), waiter)
            .await
            .expect("pop did not unblock on close")
            .unwrap();
        assert_eq!(popped, None);
    }

    #[tokio::test]
    async fn push_after_close_is_rejected() {
        let backlog = Backlog::new(4);
        backlog.close();
        assert!(!backlog.try_push(url("/a")));
    }

    #[tokio::test]
    async fn wait_returns_immediately_at_zero() {
        let tracker = WorkTracker::new();
        timeout(Duration::from_secs(1), tracker.wait())
            .await
            .expect("wait blocked with no outstanding work");
    }

    #[tokio::test]
    async fn wait_releases_when_work_drains() {
        let tracker = Arc::new(WorkTracker::new());
        tracker.add();
        tracker.add();

        let waiter = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move { tracker.wait().await })
        };

        tokio::task::yield_now().await;
        tracker.done();
        tokio::task::yield_now().await;
        tracker.done();

        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait did not release at zero")
            .unwrap();
    }
}
