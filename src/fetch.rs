//! Listing fetcher.
//!
//! One GET per run against `search_url + search_parameters`. The endpoint
//! answers with a JSON object whose `results` array holds the listings,
//! newest-first. Any transport failure, timeout, non-success status, or
//! undecodable body is a [`WatchError::Transport`].

use reqwest::blocking::Client;
use serde::Deserialize;

use immo_ads_core::Listing;

use crate::config::{FetchConfig, SearchConfig};
use crate::error::WatchError;

/// A source of freshly fetched listings, newest-first.
pub trait ListingSource {
    fn fetch(&self) -> Result<Vec<Listing>, WatchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Listing>,
}

/// Fetches one page of results over HTTP.
pub struct HttpListingSource {
    client: Client,
    url: String,
}

impl HttpListingSource {
    pub fn new(search: &SearchConfig, fetch: &FetchConfig) -> Result<Self, WatchError> {
        let client = Client::builder()
            .timeout(fetch.timeout())
            .user_agent(concat!("immo-ads/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: search.request_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ListingSource for HttpListingSource {
    fn fetch(&self) -> Result<Vec<Listing>, WatchError> {
        tracing::debug!(url = %self.url, "fetching listings");

        let res = self.client.get(&self.url).send()?;

        if !res.status().is_success() {
            let status = res.status();
            return Err(WatchError::Transport(format!("{} HTTP error", status)));
        }

        let body = res.text()?;
        let page = parse_search_response(&body)?;
        tracing::info!(count = page.len(), "fetched listings");
        Ok(page)
    }
}

/// Decodes a search response body into its listings.
pub fn parse_search_response(body: &str) -> Result<Vec<Listing>, WatchError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| WatchError::Transport(format!("invalid search response: {}", e)))?;
    Ok(response.results)
}
