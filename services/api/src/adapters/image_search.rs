//! services/api/src/adapters/image_search.rs
//!
//! This module contains the adapter for the Unsplash photo search API.
//! It implements the `ImageSearchService` port from the `core` crate.

use async_trait::async_trait;
use adventure_pack_core::{
    domain::{Attribution, ImageSearchResult},
    ports::{ImageSearchService, PortResult},
};
use serde::Deserialize;
use tracing::debug;

use super::http::{ensure_success, map_transport_error};

pub const UNSPLASH_API_URL: &str = "https://api.unsplash.com";

//=========================================================================================
// Unsplash Response Shape
//=========================================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
    user: Option<Photographer>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct Photographer {
    name: String,
    links: Option<PhotographerLinks>,
}

#[derive(Debug, Deserialize)]
struct PhotographerLinks {
    html: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ImageSearchService` using the Unsplash API.
#[derive(Clone)]
pub struct UnsplashSearchAdapter {
    client: reqwest::Client,
    api_url: String,
    access_key: String,
}

impl UnsplashSearchAdapter {
    /// Creates a new `UnsplashSearchAdapter` against the public API.
    pub fn new(client: reqwest::Client, access_key: String) -> Self {
        Self::with_api_url(client, UNSPLASH_API_URL.to_string(), access_key)
    }

    pub fn with_api_url(client: reqwest::Client, api_url: String, access_key: String) -> Self {
        Self {
            client,
            api_url,
            access_key,
        }
    }
}

/// Maps the first photo of a search response to a search result.
fn first_result(response: SearchResponse, query: &str) -> Option<ImageSearchResult> {
    let photo = response.results.into_iter().next()?;
    let attribution = photo.user.map(|user| Attribution {
        photographer: user.name,
        source_url: user.links.map(|links| links.html).unwrap_or_default(),
    });
    Some(ImageSearchResult {
        url: photo.urls.regular,
        prompt: query.to_string(),
        attribution,
    })
}

//=========================================================================================
// `ImageSearchService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageSearchService for UnsplashSearchAdapter {
    async fn search(&self, query: &str) -> PortResult<Option<ImageSearchResult>> {
        let response = self
            .client
            .get(format!("{}/search/photos", self.api_url))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
                ("content_filter", "high"),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let body: SearchResponse = ensure_success(response, "Unsplash")
            .await?
            .json()
            .await
            .map_err(map_transport_error)?;

        debug!(%query, hits = body.results.len(), "unsplash search completed");
        Ok(first_result(body, query))
    }
}
