use std::fmt;

use serde::{Deserialize, Serialize};

/// Device emulated by SerpApi when fetching the results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for `GET /search`. The API key is added by the client.
#[derive(Debug, Clone, Serialize)]
pub struct SearchParams {
    pub engine: String,
    pub q: String,
    /// Interface language, e.g. `he`.
    pub hl: String,
    /// Country of the search, e.g. `il`.
    pub gl: String,
    pub device: Device,
    /// Result offset: 0 for page 1, 10 for page 2.
    pub start: u32,
}

impl SearchParams {
    /// Google search for `query` with SerpApi's defaults for locale and device.
    pub fn google(query: &str) -> Self {
        Self {
            engine: "google".to_string(),
            q: query.to_string(),
            hl: "en".to_string(),
            gl: "us".to_string(),
            device: Device::Desktop,
            start: 0,
        }
    }

    pub fn locale(mut self, hl: &str, gl: &str) -> Self {
        self.hl = hl.to_string();
        self.gl = gl.to_string();
        self
    }

    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }
}

/// A single organic result. SerpApi's `position` is 1-based within the page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchMetadata {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// A successfully parsed search page.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub search_metadata: Option<SearchMetadata>,
    pub organic_results: Vec<OrganicResult>,
}

/// Wire shape of a `/search` response body. SerpApi reports some failures
/// with a 200 status and an `error` field.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawSearchResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub search_metadata: Option<SearchMetadata>,
    #[serde(default)]
    pub organic_results: Option<Vec<OrganicResult>>,
}
