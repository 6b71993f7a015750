//! Google Books volumes search.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::clean;
use crate::{LookupError, LookupOutcome, LookupQuery, MetadataLookup, Suggestion};

/// Google Books client configuration
#[derive(Debug, Clone)]
pub struct GoogleBooksConfig {
    /// Volumes endpoint
    pub base_url: String,
    /// Language restriction (`langRestrict`)
    pub lang: String,
    pub max_results: u32,
    pub timeout: Duration,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/books/v1/volumes".to_string(),
            lang: "fr".to_string(),
            max_results: 1,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    #[serde(default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub authors: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub small_thumbnail: Option<String>,
}

impl VolumeInfo {
    /// Extract the form suggestion from a volume.
    pub fn suggestion(&self) -> Suggestion {
        let summary = self
            .description
            .as_deref()
            .map(clean::clean_summary)
            .filter(|s| !s.trim().is_empty());

        // The regular thumbnail is the larger of the two variants.
        let cover_url = self
            .image_links
            .as_ref()
            .and_then(|links| links.thumbnail.as_deref().or(links.small_thumbnail.as_deref()))
            .filter(|url| !url.is_empty())
            .map(clean::secure_url);

        let author = Some(self.authors.join(", ")).filter(|a| !a.is_empty());

        Suggestion {
            summary,
            cover_url,
            author,
        }
    }
}

/// Metadata lookup backed by the public Google Books API (no key needed)
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    client: Client,
    config: GoogleBooksConfig,
}

impl GoogleBooksClient {
    pub fn new(config: GoogleBooksConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl MetadataLookup for GoogleBooksClient {
    async fn search(&self, query: &LookupQuery) -> Result<LookupOutcome, LookupError> {
        let expression = query.expression();
        tracing::debug!(q = %expression, lang = %self.config.lang, "searching volumes");

        let max_results = self.config.max_results.to_string();
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("q", expression.as_str()),
                ("langRestrict", self.config.lang.as_str()),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "volume search request failed");
                LookupError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "volume search returned an error");
            return Err(LookupError::Unavailable(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body: VolumesResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Unavailable(format!("JSON parse error: {}", e)))?;

        if body.total_items == 0 {
            return Ok(LookupOutcome::NotFound);
        }

        match body.items.into_iter().next() {
            Some(volume) => {
                let suggestion = volume.volume_info.suggestion();
                tracing::info!(
                    has_summary = suggestion.summary.is_some(),
                    has_cover = suggestion.cover_url.is_some(),
                    "volume found"
                );
                Ok(LookupOutcome::Found(suggestion))
            }
            None => Ok(LookupOutcome::NotFound),
        }
    }
}
