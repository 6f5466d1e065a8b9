//! Dictionary website client
//!
//! Fetches word pages and downloads resolved audio files over HTTP.
//! "Not found" and "redirected elsewhere" are ordinary outcomes; every other
//! non-success status is a terminal error.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use crate::config::DictionaryConfig;
use crate::error::DictionaryError;
use crate::types::{DictionarySource, PageOutcome};

/// reqwest-backed [`DictionarySource`]
pub struct DictionaryClient {
    http_client: reqwest::Client,
    base_url: Url,
    page_path: String,
}

impl DictionaryClient {
    pub fn new(config: &DictionaryConfig) -> Result<Self, DictionaryError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DictionaryError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DictionaryError::InvalidUrl(config.base_url.clone()));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| DictionaryError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            page_path: config.page_path.clone(),
        })
    }

    /// URL of a word's page: `{base}{page_path}/{slug}`
    pub fn page_url(&self, word: &str) -> Result<Url, DictionaryError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| DictionaryError::InvalidUrl(self.base_url.to_string()))?;
            segments.clear();
            for segment in self.page_path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
            segments.push(&word_slug(word));
        }
        Ok(url)
    }

    /// Resolve an audio path found in page markup against the site origin
    pub fn resolve_path(&self, path: &str) -> Result<Url, DictionaryError> {
        self.base_url
            .join(path)
            .map_err(|e| DictionaryError::InvalidUrl(format!("{}: {}", path, e)))
    }
}

/// Dictionary URL slug: lowercase, inner whitespace replaced by `-`
pub fn word_slug(word: &str) -> String {
    word.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn same_path(requested: &str, landed: &str) -> bool {
    requested.trim_end_matches('/') == landed.trim_end_matches('/')
}

#[async_trait]
impl DictionarySource for DictionaryClient {
    async fn fetch_page(&self, word: &str) -> Result<PageOutcome, DictionaryError> {
        let url = self.page_url(word)?;

        tracing::debug!(word = %word, url = %url, "Fetching dictionary page");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DictionaryError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::info!(word = %word, url = %url, "Dictionary has no page for word");
            return Ok(PageOutcome::NotFound);
        }

        if !status.is_success() {
            return Err(DictionaryError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let landed = response.url().path().to_string();
        if !same_path(url.path(), &landed) {
            tracing::info!(
                word = %word,
                requested = %url.path(),
                landed = %landed,
                "Dictionary redirected page request"
            );
            return Ok(PageOutcome::Redirected {
                requested: url.path().to_string(),
                landed,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DictionaryError::Network(e.to_string()))?;

        Ok(PageOutcome::Page(body))
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, DictionaryError> {
        let url = self.resolve_path(path)?;

        tracing::debug!(url = %url, "Downloading recording");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DictionaryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DictionaryError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DictionaryError::Network(e.to_string()))?;

        tracing::info!(url = %url, bytes = bytes.len(), "Downloaded recording");

        Ok(bytes.to_vec())
    }
}
