pub mod provider;
pub mod tmdb;

use std::time::Duration;

use reelgrid_core::{MediaItem, MediaKind, Season};
use thiserror::Error;

pub use provider::{DiscoverSource, MetadataSource};
pub use tmdb::TmdbClient;

/// Highest page number the discovery endpoint will serve.
pub const MAX_DISCOVER_PAGE: u32 = 500;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("network error: {0}")]
    Network(String),
    #[error("metadata API returned status {0}")]
    Status(u16),
    #[error("not found")]
    NotFound,
    #[error("provider error: {0}")]
    Provider(String),
}

/// Connection settings for the metadata API.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_base: String,
    /// Sent as the `api_key` query parameter. Leave unset when `api_base`
    /// points at a proxy that injects credentials itself.
    pub api_key: Option<String>,
    pub image_base: String,
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.themoviedb.org/3".to_string(),
            api_key: None,
            image_base: "https://image.tmdb.org/t/p".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl CatalogConfig {
    pub fn poster_url(&self, path: &str) -> String {
        format!("{}/w500{path}", self.image_base)
    }

    pub fn backdrop_url(&self, path: &str) -> String {
        format!("{}/original{path}", self.image_base)
    }

    pub fn profile_url(&self, path: &str) -> String {
        format!("{}/w185{path}", self.image_base)
    }
}

/// One popularity-sorted discovery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverQuery {
    pub kind: MediaKind,
    pub provider_id: u32,
    pub region: String,
    pub page: u32,
    pub genre: Option<u32>,
}

/// One page of discovery results, already stamped with the requested kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverPage {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<MediaItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Full record for a single title.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemDetail {
    pub item: MediaItem,
    pub genres: Vec<Genre>,
    pub tagline: Option<String>,
    pub runtime_minutes: Option<u32>,
    /// Empty for movies.
    pub seasons: Vec<Season>,
}
