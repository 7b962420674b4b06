//! In-memory sources for exercising aggregation without a network.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reelgrid_core::{CastMember, Episode, MediaItem, MediaKind, MediaRef, Trailer};
use reelgrid_metadata::{
    DiscoverPage, DiscoverQuery, DiscoverSource, Genre, ItemDetail, MetadataError, MetadataSource,
};
use tokio::sync::Semaphore;

pub fn item(kind: MediaKind, id: u64) -> MediaItem {
    MediaItem {
        id,
        kind,
        title: format!("{kind} {id}"),
        overview: None,
        poster_path: None,
        backdrop_path: None,
        release_date: None,
        vote_average: None,
        genre_ids: vec![],
    }
}

pub fn ids(items: &[MediaItem]) -> Vec<u64> {
    items.iter().map(|i| i.id).collect()
}

/// Discovery pages keyed by `(kind, region, page)`.
#[derive(Default)]
pub struct FakeCatalog {
    pages: HashMap<(MediaKind, String, u32), Vec<u64>>,
    total_pages: HashMap<MediaKind, u32>,
    failing: HashSet<(MediaKind, u32)>,
    delays: HashMap<u32, Duration>,
    /// When set, requests for pages at or past the given page wait for a
    /// permit before answering.
    gate: Option<(Arc<Semaphore>, u32)>,
    /// Items are returned with this kind regardless of the request.
    mislabel: Option<MediaKind>,
    calls: Mutex<Vec<DiscoverQuery>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, kind: MediaKind, page: u32, ids: &[u64]) -> Self {
        self.pages
            .insert((kind, "US".to_string(), page), ids.to_vec());
        self
    }

    pub fn region_page(mut self, kind: MediaKind, region: &str, page: u32, ids: &[u64]) -> Self {
        self.pages.insert((kind, region.to_string(), page), ids.to_vec());
        self
    }

    pub fn total(mut self, kind: MediaKind, total: u32) -> Self {
        self.total_pages.insert(kind, total);
        self
    }

    pub fn fail(mut self, kind: MediaKind, page: u32) -> Self {
        self.failing.insert((kind, page));
        self
    }

    pub fn delay(mut self, page: u32, by: Duration) -> Self {
        self.delays.insert(page, by);
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>, from_page: u32) -> Self {
        self.gate = Some((gate, from_page));
        self
    }

    pub fn mislabel(mut self, kind: MediaKind) -> Self {
        self.mislabel = Some(kind);
        self
    }

    pub fn calls(&self) -> Vec<DiscoverQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Yield until at least `n` requests have been issued.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.call_count() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait::async_trait]
impl DiscoverSource for FakeCatalog {
    async fn discover(&self, query: &DiscoverQuery) -> Result<DiscoverPage, MetadataError> {
        self.calls.lock().unwrap().push(query.clone());

        if let Some((gate, from_page)) = &self.gate {
            if query.page >= *from_page {
                let _permit = gate.acquire().await.unwrap();
            }
        }
        if let Some(delay) = self.delays.get(&query.page) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&(query.kind, query.page)) {
            return Err(MetadataError::Status(500));
        }

        let results = self
            .pages
            .get(&(query.kind, query.region.clone(), query.page))
            .map(|ids| {
                ids.iter()
                    .map(|id| item(self.mislabel.unwrap_or(query.kind), *id))
                    .collect()
            })
            .unwrap_or_default();

        Ok(DiscoverPage {
            page: query.page,
            total_pages: self.total_pages.get(&query.kind).copied().unwrap_or(1),
            results,
        })
    }
}

/// Per-title lookups with switchable failures.
#[derive(Default)]
pub struct FakeMetadata {
    pub cast: Option<Vec<CastMember>>,
    pub videos: Option<Vec<Trailer>>,
    pub genres: HashMap<MediaKind, Vec<Genre>>,
    pub genre_failures: HashSet<MediaKind>,
    pub search_results: Option<Vec<MediaItem>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeMetadata {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MetadataSource for FakeMetadata {
    fn name(&self) -> &str {
        "fake"
    }

    async fn details(&self, media: MediaRef) -> Result<ItemDetail, MetadataError> {
        self.record(format!("details {media}"));
        Err(MetadataError::NotFound)
    }

    async fn credits(&self, media: MediaRef) -> Result<Vec<CastMember>, MetadataError> {
        self.record(format!("credits {media}"));
        self.cast.clone().ok_or(MetadataError::Status(500))
    }

    async fn videos(&self, media: MediaRef) -> Result<Vec<Trailer>, MetadataError> {
        self.record(format!("videos {media}"));
        self.videos.clone().ok_or(MetadataError::Status(500))
    }

    async fn recommendations(&self, media: MediaRef) -> Result<Vec<MediaItem>, MetadataError> {
        self.record(format!("recommendations {media}"));
        Ok(vec![])
    }

    async fn season_episodes(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Vec<Episode>, MetadataError> {
        self.record(format!("season {series_id}/{season_number}"));
        Ok(vec![])
    }

    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, MetadataError> {
        self.record(format!("genres {kind}"));
        if self.genre_failures.contains(&kind) {
            return Err(MetadataError::Network("connection reset".into()));
        }
        Ok(self.genres.get(&kind).cloned().unwrap_or_default())
    }

    async fn search(&self, query: &str) -> Result<Vec<MediaItem>, MetadataError> {
        self.record(format!("search {query}"));
        self.search_results
            .clone()
            .ok_or(MetadataError::Network("timed out".into()))
    }
}
