pub mod error;
pub mod types;

pub use error::{Result, SerpApiError};
pub use types::{Device, OrganicResult, SearchMetadata, SearchParams, SearchResponse};

use types::RawSearchResponse;

const BASE_URL: &str = "https://serpapi.com";

pub struct SerpApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_http_client(reqwest::Client::new(), api_key)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies).
    pub fn with_http_client(client: reqwest::Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch one page of search results.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        tracing::debug!(
            q = %params.q,
            device = %params.device,
            start = params.start,
            "SerpApi search"
        );

        let url = format!("{}/search", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<RawSearchResponse>(&body)
                .ok()
                .and_then(|raw| raw.error)
                .unwrap_or(body);
            return Err(SerpApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawSearchResponse = serde_json::from_str(&body)?;
        parse_search_response(raw, status.as_u16())
    }
}

fn parse_search_response(raw: RawSearchResponse, status: u16) -> Result<SearchResponse> {
    if let Some(message) = raw.error {
        return Err(SerpApiError::Api { status, message });
    }

    let organic_results = raw
        .organic_results
        .ok_or_else(|| SerpApiError::Parse("response has no organic_results".to_string()))?;

    Ok(SearchResponse {
        search_metadata: raw.search_metadata,
        organic_results,
    })
}
