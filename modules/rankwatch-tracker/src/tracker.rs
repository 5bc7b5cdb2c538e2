use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use rankwatch_common::{
    normalize_domain, Device, HistoryRecord, RankEntry, RankWatchError, Result,
};

use crate::lookup::{lookup_rank, RankSearcher};
use crate::store::{Document, DomainStore};

/// Idle per-domain locks are pruned once the map grows past this.
const MAX_IDLE_DOMAIN_LOCKS: usize = 1000;

/// Domain/keyword bookkeeping and rank checks on top of a [`DomainStore`].
///
/// Every load-mutate-save cycle runs under one store-wide lock, so
/// concurrent requests cannot overwrite each other's changes. Rank checks on
/// the same domain are serialized by a per-domain lock; their search calls
/// run outside the store lock.
pub struct Tracker {
    store: Arc<dyn DomainStore>,
    searcher: Arc<dyn RankSearcher>,
    store_lock: Mutex<()>,
    domain_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Tracker {
    pub fn new(store: Arc<dyn DomainStore>, searcher: Arc<dyn RankSearcher>) -> Self {
        Self {
            store,
            searcher,
            store_lock: Mutex::new(()),
            domain_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Start tracking a domain. Existing keywords are left alone.
    /// Returns the normalized domain.
    pub async fn add_domain(&self, raw_domain: &str) -> Result<String> {
        let domain = required_domain(raw_domain)?;

        let _guard = self.store_lock.lock().await;
        let mut document = self.store.load().await?;
        if document.upsert_domain(&domain) {
            self.store.save(&document).await?;
            info!(domain = %domain, "Domain added");
        }
        Ok(domain)
    }

    /// Track a keyword under a domain, creating the domain if it is new.
    /// An existing keyword keeps its history.
    pub async fn add_keyword(&self, raw_domain: &str, raw_keyword: &str) -> Result<()> {
        let domain = required_domain(raw_domain)?;
        let keyword = required_keyword(raw_keyword)?;

        let _guard = self.store_lock.lock().await;
        let mut document = self.store.load().await?;
        if document.upsert_keyword(&domain, &keyword) {
            self.store.save(&document).await?;
            info!(domain = %domain, keyword = %keyword, "Keyword added");
        }
        Ok(())
    }

    /// Look up desktop and mobile ranks for every keyword of `raw_domain`,
    /// append one record per keyword and return a summary per keyword.
    ///
    /// Keywords are checked one after another. The first failed lookup aborts
    /// the check and nothing is saved.
    pub async fn check_rank(&self, raw_domain: &str) -> Result<Vec<RankEntry>> {
        let domain = required_domain(raw_domain)?;

        let domain_lock = self.domain_lock(&domain).await;
        let _domain_guard = domain_lock.lock().await;

        let keywords = {
            let _guard = self.store_lock.lock().await;
            self.store.load().await?.keywords(&domain)
        }
        .ok_or_else(|| RankWatchError::NotFound(format!("domain {domain} is not tracked")))?;

        info!(domain = %domain, keywords = keywords.len(), "Checking ranks");
        let today = Utc::now().date_naive();

        let mut records = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let desktop = lookup_rank(self.searcher.as_ref(), &domain, &keyword, Device::Desktop).await?;
            let mobile = lookup_rank(self.searcher.as_ref(), &domain, &keyword, Device::Mobile).await?;
            info!(domain = %domain, keyword = %keyword, ?desktop, ?mobile, "Rank checked");
            records.push((keyword, HistoryRecord::new(today, desktop, mobile)));
        }

        let _guard = self.store_lock.lock().await;
        let mut document = self.store.load().await?;
        let mut appended = 0;
        for (keyword, record) in &records {
            if document.append_record(&domain, keyword, record.clone()) {
                appended += 1;
            } else {
                warn!(domain = %domain, keyword = %keyword, "Keyword removed during rank check, dropping result");
            }
        }
        if appended > 0 {
            self.store.save(&document).await?;
        }

        Ok(records
            .iter()
            .map(|(keyword, record)| RankEntry::from_record(keyword, record))
            .collect())
    }

    pub async fn list_domains(&self) -> Result<Vec<String>> {
        Ok(self.load().await?.domains())
    }

    /// Keywords of a domain; empty if the domain is not tracked.
    pub async fn list_keywords(&self, raw_domain: &str) -> Result<Vec<String>> {
        let domain = normalize_domain(raw_domain);
        Ok(self.load().await?.keywords(&domain).unwrap_or_default())
    }

    /// History of a keyword, oldest first; empty if absent.
    pub async fn keyword_history(&self, raw_domain: &str, keyword: &str) -> Result<Vec<HistoryRecord>> {
        let domain = normalize_domain(raw_domain);
        Ok(self.load().await?.history(&domain, keyword.trim()))
    }

    /// Stop tracking a domain, dropping all its keywords and history.
    pub async fn delete_domain(&self, raw_domain: &str) -> Result<()> {
        let domain = normalize_domain(raw_domain);

        // Waits for an in-flight rank check on this domain to commit first.
        let domain_lock = self.domain_lock(&domain).await;
        let _domain_guard = domain_lock.lock().await;

        let _guard = self.store_lock.lock().await;
        let mut document = self.store.load().await?;
        if !document.remove_domain(&domain) {
            return Err(RankWatchError::NotFound(format!("domain {domain} is not tracked")));
        }
        self.store.save(&document).await?;
        info!(domain = %domain, "Domain deleted");
        Ok(())
    }

    /// Stop tracking one keyword of a domain, dropping its history.
    pub async fn delete_keyword(&self, raw_domain: &str, keyword: &str) -> Result<()> {
        let domain = normalize_domain(raw_domain);
        let keyword = keyword.trim();

        let domain_lock = self.domain_lock(&domain).await;
        let _domain_guard = domain_lock.lock().await;

        let _guard = self.store_lock.lock().await;
        let mut document = self.store.load().await?;
        if !document.remove_keyword(&domain, keyword) {
            return Err(RankWatchError::NotFound(format!(
                "keyword {keyword:?} is not tracked for {domain}"
            )));
        }
        self.store.save(&document).await?;
        info!(domain = %domain, keyword = %keyword, "Keyword deleted");
        Ok(())
    }

    async fn load(&self) -> Result<Document> {
        let _guard = self.store_lock.lock().await;
        self.store.load().await
    }

    async fn domain_lock(&self, domain: &str) -> Arc<Mutex<()>> {
        let mut locks = self.domain_locks.lock().await;
        if locks.len() > MAX_IDLE_DOMAIN_LOCKS {
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        locks
            .entry(domain.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn required_domain(raw: &str) -> Result<String> {
    let domain = normalize_domain(raw);
    if domain.is_empty() {
        return Err(RankWatchError::Validation("domain is required".to_string()));
    }
    Ok(domain)
}

fn required_keyword(raw: &str) -> Result<String> {
    let keyword = raw.trim();
    if keyword.is_empty() {
        return Err(RankWatchError::Validation("keyword is required".to_string()));
    }
    Ok(keyword.to_string())
}
