use std::{num::NonZeroU32, sync::OnceLock, time::Duration};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::InMemoryState,
};
use serde::Deserialize;
use tracing::{instrument, Level};
use url::Url;

/// Results requested per search.
pub const RESULTS_PER_QUERY: u8 = 5;

static RATE_LIMIT: u32 = 5;
static DELAY_JITTER: u64 = 1;
static RATE_LIMITER: OnceLock<
    governor::RateLimiter<
        governor::state::NotKeyed,
        InMemoryState,
        QuantaClock,
        NoOpMiddleware<QuantaInstant>,
    >,
> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct SearchResponse {
    // absent when the search matched nothing
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    image: ImageMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageMeta {
    thumbnail_link: String,
}

/// Client for the Custom Search JSON API in image mode.
#[derive(Debug, Clone)]
pub struct ImageSearch {
    client: reqwest::Client,
    endpoint: Url,
    engine_id: String,
}

impl ImageSearch {
    pub fn new(client: reqwest::Client, endpoint: Url, engine_id: impl Into<String>) -> Self {
        Self {
            client,
            endpoint,
            engine_id: engine_id.into(),
        }
    }

    pub fn request_url(&self, query: &str, api_key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("cx", &self.engine_id)
            .append_pair("key", api_key)
            .append_pair("searchType", "image")
            .append_pair("num", &RESULTS_PER_QUERY.to_string());
        url
    }

    /// Thumbnail URLs for `query`. An empty list means the search ran and found nothing.
    #[instrument(skip(self, api_key), level = Level::DEBUG)]
    pub async fn search(&self, query: &str, api_key: &str) -> crate::Result<Vec<String>> {
        let rate_limiter = RATE_LIMITER.get_or_init(|| {
            governor::RateLimiter::direct(governor::Quota::per_second(
                NonZeroU32::new(RATE_LIMIT).expect("rate limit should be non-zero"),
            ))
        });
        let jitter = governor::Jitter::new(Duration::ZERO, Duration::from_millis(DELAY_JITTER));
        rate_limiter.until_ready_with_jitter(jitter).await;

        let url = self.request_url(query, api_key);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        log::debug!("Custom Search returned {} item(s) for {query}", parsed.items.len());
        Ok(parsed
            .items
            .into_iter()
            .map(|item| item.image.thumbnail_link)
            .collect())
    }
}
