//! Bounded-concurrency request admission.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::{HttpClient, Response};

/// Default number of requests allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 30;

/// Admits any number of fetches while keeping at most `max_concurrent` of
/// them on the wire.
///
/// Excess submissions wait on a fair semaphore, so they are admitted in the
/// order they were submitted. A request's permit is released as soon as its
/// transport call returns, successfully or not, which admits the next waiter.
/// Nothing is retried: transport errors go straight back to the submitter.
pub struct FetchQueue<C: HttpClient> {
    client: C,
    permits: Semaphore,
    max_concurrent: usize,
    waiting: AtomicUsize,
}

impl<C: HttpClient> FetchQueue<C> {
    pub fn new(client: C) -> Self {
        Self::with_max_concurrent(client, DEFAULT_MAX_CONCURRENT)
    }

    /// A cap of zero is treated as one so that submissions always make progress.
    pub fn with_max_concurrent(client: C, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            client,
            permits: Semaphore::new(max_concurrent),
            max_concurrent,
            waiting: AtomicUsize::new(0),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Requests currently on the wire.
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.permits.available_permits()
    }

    /// Requests submitted but not yet admitted.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::Acquire)
    }

    /// Fetch `url` once a slot is free.
    ///
    /// Any answered request resolves to `Ok`, including non-2xx responses;
    /// use [`Response::error_for_status`] to reject those.
    pub async fn submit(&self, url: &str) -> Result<Response> {
        let permit = {
            let _waiting = WaitingGuard::enter(&self.waiting);
            self.permits.acquire().await.map_err(|_| Error::Closed)?
        };

        debug!(
            url,
            in_flight = self.in_flight(),
            waiting = self.waiting(),
            "fetch admitted"
        );
        let result = self.client.get(url).await;
        drop(permit);

        match result {
            Ok(response) => {
                debug!(url, status = response.status(), "fetch finished");
                Ok(response)
            }
            Err(e) => {
                debug!(url, error = %e, "fetch failed");
                Err(Error::Network(e.to_string()))
            }
        }
    }

    /// Stop admitting requests. Waiting and future submissions fail with
    /// [`Error::Closed`]; requests already in flight run to completion.
    pub fn close(&self) {
        self.permits.close();
    }
}

/// Keeps the waiting count honest even when a submission is dropped while
/// still queued.
struct WaitingGuard<'a>(&'a AtomicUsize);

impl<'a> WaitingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct Echo;

    impl HttpClient for Echo {
        type Error = Infallible;

        async fn get(&self, url: &str) -> std::result::Result<Response, Self::Error> {
            Ok(Response::new(url, 200, url.as_bytes().to_vec()))
        }
    }

    #[test]
    fn default_cap() {
        let queue = FetchQueue::new(Echo);
        assert_eq!(queue.max_concurrent(), 30);
        assert_eq!(queue.in_flight(), 0);
        assert_eq!(queue.waiting(), 0);
    }

    #[test]
    fn zero_cap_is_clamped() {
        let queue = FetchQueue::with_max_concurrent(Echo, 0);
        assert_eq!(queue.max_concurrent(), 1);
    }

    #[tokio::test]
    async fn submit_releases_slot() {
        let queue = FetchQueue::with_max_concurrent(Echo, 2);
        let response = queue.submit("http://example.com/a").await.unwrap();
        assert_eq!(response.bytes().as_ref(), b"http://example.com/a");
        assert_eq!(queue.in_flight(), 0);
    }

    #[tokio::test]
    async fn closed_queue_rejects() {
        let queue = FetchQueue::new(Echo);
        queue.close();
        assert!(matches!(queue.submit("http://example.com/a").await, Err(Error::Closed)));
        assert_eq!(queue.waiting(), 0);
    }
}
