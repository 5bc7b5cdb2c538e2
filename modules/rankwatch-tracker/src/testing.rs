// Test doubles for the tracker.
//
// MockSearcher answers RankSearcher queries from a (keyword, device, start)
// table. Unregistered pages come back empty; keywords marked with
// `failing_on` return an upstream error.
//
// GatedSearcher parks its first query until `release()` and records how many
// queries were in flight at once.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use rankwatch_common::{Device, RankWatchError, Result};

use crate::lookup::{PageQuery, RankSearcher};

#[derive(Default)]
pub struct MockSearcher {
    pages: HashMap<PageQuery, Vec<String>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<PageQuery>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, keyword: &str, device: Device, start: u32, links: &[&str]) -> Self {
        let query = PageQuery {
            keyword: keyword.to_string(),
            device,
            start,
        };
        self.pages
            .insert(query, links.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Same first page for both devices.
    pub fn on_first_page(self, keyword: &str, links: &[&str]) -> Self {
        self.on_page(keyword, Device::Desktop, 0, links)
            .on_page(keyword, Device::Mobile, 0, links)
    }

    pub fn failing_on(mut self, keyword: &str) -> Self {
        self.failing.insert(keyword.to_string());
        self
    }

    /// Every query received so far, in order.
    pub fn calls(&self) -> Vec<PageQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RankSearcher for MockSearcher {
    async fn organic_links(&self, query: &PageQuery) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push(query.clone());
        if self.failing.contains(&query.keyword) {
            return Err(RankWatchError::Upstream(format!(
                "Network error: mock failure for {:?}",
                query.keyword
            )));
        }
        Ok(self.pages.get(query).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// GatedSearcher
// ---------------------------------------------------------------------------

/// Returns the same links for every query. The first query blocks until
/// [`GatedSearcher::release`] is called.
pub struct GatedSearcher {
    links: Vec<String>,
    gate_open: AtomicBool,
    first_taken: AtomicBool,
    entered: Notify,
    release: Notify,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl GatedSearcher {
    pub fn new(links: &[&str]) -> Self {
        Self {
            links: links.iter().map(|l| l.to_string()).collect(),
            gate_open: AtomicBool::new(false),
            first_taken: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Resolves once the first query is parked at the gate.
    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.gate_open.store(true, Ordering::SeqCst);
        self.release.notify_one();
    }

    /// Highest number of queries observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RankSearcher for GatedSearcher {
    async fn organic_links(&self, _query: &PageQuery) -> Result<Vec<String>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.first_taken.swap(true, Ordering::SeqCst) && !self.gate_open.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.links.clone())
    }
}
