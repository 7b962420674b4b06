//! Multi-page catalog aggregation.
//!
//! Merge rules:
//! 1. All pages of one call are requested concurrently; any failure fails
//!    the whole call and nothing from it is merged.
//! 2. Results are walked page ascending, then region (registry order), then
//!    in-page order. Completion order never matters.
//! 3. The first occurrence of a `(kind, id)` wins; later repeats are dropped.
//! 4. Every item is stamped with the kind it was requested as.

use std::ops::RangeInclusive;
use std::sync::Arc;

use futures::future::try_join_all;
use reelgrid_core::{MediaItem, MediaKind};
use reelgrid_metadata::{DiscoverPage, DiscoverQuery, DiscoverSource};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cursor::{PageCursor, PageSpan};
use crate::dedup::DedupIndex;
use crate::providers::StreamingProvider;
use crate::{AggregatorConfig, CatalogError, PerKind};

/// What a provider view browses: provider, regions and optional genres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogScope {
    pub provider_id: u32,
    pub regions: Vec<String>,
    pub genres: PerKind<Option<u32>>,
}

impl CatalogScope {
    pub fn for_provider(provider: &StreamingProvider) -> Self {
        Self {
            provider_id: provider.id,
            regions: provider.regions.iter().map(|r| r.to_string()).collect(),
            genres: PerKind::default(),
        }
    }

    pub fn with_genre(mut self, kind: MediaKind, genre: u32) -> Self {
        *self.genres.get_mut(kind) = Some(genre);
        self
    }

    /// One query per (page, region), page-major.
    fn queries(&self, kind: MediaKind, pages: RangeInclusive<u32>) -> Vec<DiscoverQuery> {
        let genre = *self.genres.get(kind);
        pages
            .flat_map(|page| {
                self.regions.iter().map(move |region| DiscoverQuery {
                    kind,
                    provider_id: self.provider_id,
                    region: region.clone(),
                    page,
                    genre,
                })
            })
            .collect()
    }
}

/// Merged result of the initial multi-page fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialBatch {
    pub movies: Vec<MediaItem>,
    pub tv_shows: Vec<MediaItem>,
    pub cursors: PerKind<PageCursor>,
}

impl InitialBatch {
    pub fn items(&self, kind: MediaKind) -> &[MediaItem] {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Tv => &self.tv_shows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadMoreOutcome {
    pub new_items: Vec<MediaItem>,
    /// `None` when the request was ignored by the cursor guard.
    pub span: Option<PageSpan>,
}

pub struct Aggregator {
    source: Arc<dyn DiscoverSource>,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(source: Arc<dyn DiscoverSource>, config: AggregatorConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Fetch `pages_per_kind` pages of both kinds and merge them.
    pub async fn fetch_initial_batch(
        &self,
        scope: &CatalogScope,
    ) -> Result<InitialBatch, CatalogError> {
        let last = self.config.pages_per_kind.max(1);

        let (movie_pages, tv_pages) = futures::try_join!(
            self.fetch_pages(scope, MediaKind::Movie, 1..=last),
            self.fetch_pages(scope, MediaKind::Tv, 1..=last),
        )?;

        let movie_cursor = initial_cursor(&movie_pages, last);
        let tv_cursor = initial_cursor(&tv_pages, last);

        let movies = merge_pages(MediaKind::Movie, &movie_pages, &mut DedupIndex::new());
        let tv_shows = merge_pages(MediaKind::Tv, &tv_pages, &mut DedupIndex::new());

        info!(
            provider = scope.provider_id,
            movies = movies.len(),
            tv_shows = tv_shows.len(),
            movie_pages = movie_cursor.total_pages(),
            tv_pages = tv_cursor.total_pages(),
            "initial catalog batch merged"
        );

        Ok(InitialBatch {
            movies,
            tv_shows,
            cursors: PerKind::new(movie_cursor, tv_cursor),
        })
    }

    /// Fetch the next span of pages for one kind and return the items not
    /// already in `existing`.
    ///
    /// The cursor stays in `Loading` for the duration of the call. A guarded
    /// call issues no requests and returns an empty outcome. On failure the
    /// cursor is left at its previous page.
    pub async fn load_more(
        &self,
        scope: &CatalogScope,
        kind: MediaKind,
        cursor: &mut PageCursor,
        existing: &[MediaItem],
    ) -> Result<LoadMoreOutcome, CatalogError> {
        let Some(span) = cursor.begin_load_more(self.config.load_more_span) else {
            debug!(provider = scope.provider_id, kind = %kind, "load more ignored");
            return Ok(LoadMoreOutcome {
                new_items: Vec::new(),
                span: None,
            });
        };

        match self.fetch_span(scope, kind, span).await {
            Ok(pages) => {
                let mut seen = DedupIndex::seeded_from(existing);
                let new_items = merge_pages(kind, &pages, &mut seen);
                cursor.complete(span);
                Ok(LoadMoreOutcome {
                    new_items,
                    span: Some(span),
                })
            }
            Err(e) => {
                cursor.abort();
                Err(e)
            }
        }
    }

    pub async fn fetch_span(
        &self,
        scope: &CatalogScope,
        kind: MediaKind,
        span: PageSpan,
    ) -> Result<Vec<DiscoverPage>, CatalogError> {
        self.fetch_pages(scope, kind, span.pages()).await
    }

    async fn fetch_pages(
        &self,
        scope: &CatalogScope,
        kind: MediaKind,
        pages: RangeInclusive<u32>,
    ) -> Result<Vec<DiscoverPage>, CatalogError> {
        let queries = scope.queries(kind, pages);
        debug!(
            provider = scope.provider_id,
            kind = %kind,
            requests = queries.len(),
            "fetching discovery pages"
        );

        try_join_all(queries.iter().map(|q| self.source.discover(q)))
            .await
            .map_err(|e| {
                warn!(provider = scope.provider_id, kind = %kind, error = %e, "discovery fetch failed");
                CatalogError::Fetch { kind, source: e }
            })
    }
}

/// The first response is authoritative for the page ceiling.
fn initial_cursor(pages: &[DiscoverPage], fetched_through: u32) -> PageCursor {
    let mut cursor = PageCursor::new();
    let total = pages.first().map(|p| p.total_pages).unwrap_or(1);
    cursor.initialize(total, fetched_through);
    cursor
}

/// Walk `pages` in order, stamping `kind` and keeping first occurrences.
pub fn merge_pages(kind: MediaKind, pages: &[DiscoverPage], seen: &mut DedupIndex) -> Vec<MediaItem> {
    let mut merged = Vec::new();
    for page in pages {
        for item in &page.results {
            if seen.insert(kind, item.id) {
                let mut item = item.clone();
                item.kind = kind;
                merged.push(item);
            }
        }
    }
    merged
}
