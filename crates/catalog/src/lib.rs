#![allow(clippy::collapsible_if, clippy::should_implement_trait)]
pub mod aggregator;
pub mod cursor;
pub mod dedup;
pub mod detail;
pub mod genres;
pub mod picks;
pub mod providers;
pub mod search;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

use reelgrid_core::MediaKind;
use reelgrid_metadata::MetadataError;
use serde::Serialize;
use thiserror::Error;

pub use aggregator::{Aggregator, CatalogScope, InitialBatch, LoadMoreOutcome};
pub use cursor::{CursorState, PageCursor, PageSpan};
pub use dedup::DedupIndex;
pub use providers::StreamingProvider;
pub use view::{Delivery, LoadMoreResult, ProviderView, ViewSnapshot, ViewStatus};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("fetching {kind} pages failed: {source}")]
    Fetch {
        kind: MediaKind,
        #[source]
        source: MetadataError,
    },
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// Tuning for catalog aggregation and the detail overlay.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Pages requested per kind (and per region) when a view loads.
    pub pages_per_kind: u32,
    /// Pages requested by one "load more".
    pub load_more_span: u32,
    /// Cast members kept for the detail overlay.
    pub detail_cast_limit: usize,
    /// Items kept in a genre picks row.
    pub picks_limit: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            pages_per_kind: 5,
            load_more_span: 3,
            detail_cast_limit: 18,
            picks_limit: 20,
        }
    }
}

/// One value per content kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PerKind<T> {
    pub movie: T,
    pub tv: T,
}

impl<T> PerKind<T> {
    pub fn new(movie: T, tv: T) -> Self {
        Self { movie, tv }
    }

    pub fn get(&self, kind: MediaKind) -> &T {
        match kind {
            MediaKind::Movie => &self.movie,
            MediaKind::Tv => &self.tv,
        }
    }

    pub fn get_mut(&mut self, kind: MediaKind) -> &mut T {
        match kind {
            MediaKind::Movie => &mut self.movie,
            MediaKind::Tv => &mut self.tv,
        }
    }
}
