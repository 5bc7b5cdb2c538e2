//! Persistence for the domain → keyword → history document.
//!
//! The whole document is read on every `load()` and rewritten on every
//! `save()`. Callers that mutate it must hold the tracker's store lock for
//! the full load-mutate-save cycle.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use rankwatch_common::{HistoryRecord, Result};

/// `{ domain: { keyword: [record, ...] } }`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    domains: IndexMap<String, IndexMap<String, Vec<HistoryRecord>>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    /// Insert `domain` with no keywords unless it already exists.
    /// Returns true if it was created.
    pub fn upsert_domain(&mut self, domain: &str) -> bool {
        if self.domains.contains_key(domain) {
            return false;
        }
        self.domains.insert(domain.to_string(), IndexMap::new());
        true
    }

    /// Register `keyword` under `domain`, creating the domain if needed.
    /// An existing keyword keeps its history. Returns true if anything changed.
    pub fn upsert_keyword(&mut self, domain: &str, keyword: &str) -> bool {
        let created_domain = !self.domains.contains_key(domain);
        let keywords = self.domains.entry(domain.to_string()).or_default();
        if keywords.contains_key(keyword) {
            return created_domain;
        }
        keywords.insert(keyword.to_string(), Vec::new());
        true
    }

    /// Remove a domain with all its keywords and history.
    pub fn remove_domain(&mut self, domain: &str) -> bool {
        self.domains.shift_remove(domain).is_some()
    }

    pub fn remove_keyword(&mut self, domain: &str, keyword: &str) -> bool {
        self.domains
            .get_mut(domain)
            .is_some_and(|keywords| keywords.shift_remove(keyword).is_some())
    }

    pub fn domains(&self) -> Vec<String> {
        self.domains.keys().cloned().collect()
    }

    /// Keywords of `domain`, or `None` if the domain is not tracked.
    pub fn keywords(&self, domain: &str) -> Option<Vec<String>> {
        self.domains
            .get(domain)
            .map(|keywords| keywords.keys().cloned().collect())
    }

    /// History of a keyword; empty if the domain or keyword is absent.
    pub fn history(&self, domain: &str, keyword: &str) -> Vec<HistoryRecord> {
        self.domains
            .get(domain)
            .and_then(|keywords| keywords.get(keyword))
            .cloned()
            .unwrap_or_default()
    }

    /// Append to an existing keyword's history. Returns false, leaving the
    /// document untouched, if the domain or keyword is absent.
    pub fn append_record(&mut self, domain: &str, keyword: &str, record: HistoryRecord) -> bool {
        match self
            .domains
            .get_mut(domain)
            .and_then(|keywords| keywords.get_mut(keyword))
        {
            Some(history) => {
                history.push(record);
                true
            }
            None => false,
        }
    }
}

// --- DomainStore trait ---

#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Read the whole document, initializing an empty one if none exists.
    async fn load(&self) -> Result<Document>;
    /// Overwrite the whole document.
    async fn save(&self, document: &Document) -> Result<()>;
}

// --- JSON file store ---

/// Stores the document as pretty-printed JSON in a single file. Writes
/// overwrite the file in place and are not atomic.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DomainStore for JsonFileStore {
    async fn load(&self) -> Result<Document> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Document::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Data file missing, creating empty store");
                let document = Document::new();
                self.save(&document).await?;
                Ok(document)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

// --- In-memory store ---

/// Keeps the document in process memory. Each `load()` returns a copy, so
/// unsaved mutations are never visible to later loads.
#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }
}

#[async_trait]
impl DomainStore for MemoryStore {
    async fn load(&self) -> Result<Document> {
        Ok(self.document.lock().await.clone())
    }

    async fn save(&self, document: &Document) -> Result<()> {
        *self.document.lock().await = document.clone();
        Ok(())
    }
}
