use reelgrid_core::{CastMember, Episode, MediaItem, MediaKind, MediaRef, Trailer};

use crate::{DiscoverPage, DiscoverQuery, Genre, ItemDetail, MetadataError};

/// Paginated, provider-filtered discovery.
#[async_trait::async_trait]
pub trait DiscoverSource: Send + Sync {
    async fn discover(&self, query: &DiscoverQuery) -> Result<DiscoverPage, MetadataError>;
}

/// Per-title lookups used by the detail overlay and the watch page.
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    fn name(&self) -> &str;

    async fn details(&self, media: MediaRef) -> Result<ItemDetail, MetadataError>;

    /// Credited cast in billing order.
    async fn credits(&self, media: MediaRef) -> Result<Vec<CastMember>, MetadataError>;

    async fn videos(&self, media: MediaRef) -> Result<Vec<Trailer>, MetadataError>;

    async fn recommendations(&self, media: MediaRef) -> Result<Vec<MediaItem>, MetadataError>;

    async fn season_episodes(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Vec<Episode>, MetadataError>;

    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, MetadataError>;

    /// Multi-kind title search. Non-title results (people) are dropped.
    async fn search(&self, query: &str) -> Result<Vec<MediaItem>, MetadataError>;
}
