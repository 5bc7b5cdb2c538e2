use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use rankwatch_common::{Device, RankWatchError, Result};
use serpapi_client::{SearchParams, SerpApiClient};

/// Result pages scanned per lookup.
pub const PAGES: u32 = 2;
/// Organic results per page; also the offset step between pages.
pub const PAGE_SIZE: u32 = 10;
/// Searches run as Hebrew-language Google in Israel.
pub const LANGUAGE: &str = "he";
pub const COUNTRY: &str = "il";

/// One results page to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageQuery {
    pub keyword: String,
    pub device: Device,
    /// Offset of the page's first result: 0, 10, ...
    pub start: u32,
}

// --- RankSearcher trait ---

#[async_trait]
pub trait RankSearcher: Send + Sync {
    /// Links of the page's organic results, in page order.
    async fn organic_links(&self, query: &PageQuery) -> Result<Vec<String>>;
}

// --- SerpApi ---

pub struct SerpApiSearcher {
    client: SerpApiClient,
}

impl SerpApiSearcher {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RankWatchError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::from_client(SerpApiClient::with_http_client(
            http,
            api_key.to_string(),
        )))
    }

    pub fn from_client(client: SerpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RankSearcher for SerpApiSearcher {
    async fn organic_links(&self, query: &PageQuery) -> Result<Vec<String>> {
        let device = match query.device {
            Device::Desktop => serpapi_client::Device::Desktop,
            Device::Mobile => serpapi_client::Device::Mobile,
        };
        let params = SearchParams::google(&query.keyword)
            .locale(LANGUAGE, COUNTRY)
            .device(device)
            .start(query.start);

        let response = self
            .client
            .search(&params)
            .await
            .map_err(|e| RankWatchError::Upstream(e.to_string()))?;

        Ok(response
            .organic_results
            .into_iter()
            .map(|r| r.link)
            .collect())
    }
}

/// Index of the first link containing `domain`.
pub fn position_in_page(links: &[String], domain: &str) -> Option<usize> {
    links.iter().position(|link| link.contains(domain))
}

/// 1-based rank of `domain` for `keyword` across the first [`PAGES`] pages,
/// or `None` if no page links to it. Stops at the first matching page.
/// Errors from the searcher propagate without retry.
pub async fn lookup_rank(
    searcher: &dyn RankSearcher,
    domain: &str,
    keyword: &str,
    device: Device,
) -> Result<Option<u32>> {
    for page in 0..PAGES {
        let start = page * PAGE_SIZE;
        let query = PageQuery {
            keyword: keyword.to_string(),
            device,
            start,
        };
        let links = searcher.organic_links(&query).await?;
        if let Some(index) = position_in_page(&links, domain) {
            let rank = start + index as u32 + 1;
            debug!(domain, keyword, %device, rank, "Domain found");
            return Ok(Some(rank));
        }
    }
    debug!(domain, keyword, %device, "Domain not in top results");
    Ok(None)
}
