//! Everything the watch page shows around the player.
//!
//! The title detail, recommendations, cast, trailer and the season list are
//! looked up concurrently. Any of them can fail on its own; the page then
//! shows that section empty and the player still works.

use reelgrid_catalog::detail::pick_trailer;
use reelgrid_core::{CastMember, Episode, MediaItem, MediaKind, MediaRef, Season, Trailer};
use reelgrid_metadata::{ItemDetail, MetadataSource};
use serde::Serialize;
use tracing::{debug, warn};

use crate::WatchError;
use crate::selection::PlaybackSelection;

pub const RECOMMENDATION_LIMIT: usize = 10;
pub const CAST_LIMIT: usize = 18;

/// Build a reference from the page's `type` and `id` query values.
pub fn parse_reference(kind: Option<&str>, id: Option<&str>) -> Result<MediaRef, WatchError> {
    let kind = kind.and_then(MediaKind::from_str);
    let id = id.and_then(|id| id.trim().parse::<u64>().ok());
    match (kind, id) {
        (Some(kind), Some(id)) => Ok(MediaRef::new(kind, id)),
        _ => Err(WatchError::MissingReference),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchContext {
    pub detail: Option<ItemDetail>,
    pub recommendations: Vec<MediaItem>,
    pub cast: Vec<CastMember>,
    pub trailer: Option<Trailer>,
    /// Empty for movies.
    pub seasons: Vec<Season>,
    /// Episodes of the selected season.
    pub episodes: Vec<Episode>,
    pub selection: PlaybackSelection,
}

impl WatchContext {
    pub async fn load(source: &dyn MetadataSource, media: MediaRef) -> Self {
        let (detail, recommendations, cast, videos) = tokio::join!(
            source.details(media),
            source.recommendations(media),
            source.credits(media),
            source.videos(media),
        );

        let detail = detail
            .inspect_err(|e| warn!(media = %media, error = %e, "detail unavailable"))
            .ok();
        let mut recommendations = recommendations.unwrap_or_else(|e| {
            warn!(media = %media, error = %e, "recommendations unavailable");
            Vec::new()
        });
        recommendations.truncate(RECOMMENDATION_LIMIT);
        let mut cast = cast.unwrap_or_else(|e| {
            warn!(media = %media, error = %e, "cast unavailable");
            Vec::new()
        });
        cast.truncate(CAST_LIMIT);
        let trailer = match videos {
            Ok(videos) => pick_trailer(&videos),
            Err(e) => {
                warn!(media = %media, error = %e, "trailer unavailable");
                None
            }
        };

        let seasons = match (media.kind, &detail) {
            (MediaKind::Tv, Some(d)) => d.seasons.clone(),
            _ => Vec::new(),
        };

        let mut ctx = Self {
            detail,
            recommendations,
            cast,
            trailer,
            seasons,
            episodes: Vec::new(),
            selection: PlaybackSelection::new(media),
        };
        if let Some(first) = ctx.seasons.first().map(|s| s.season_number) {
            ctx.change_season(source, first).await;
        }
        debug!(
            media = %media,
            seasons = ctx.seasons.len(),
            cast = ctx.cast.len(),
            "watch context loaded"
        );
        ctx
    }

    pub fn media(&self) -> MediaRef {
        self.selection.media()
    }

    /// Select a season and load its episodes. A failed lookup leaves the
    /// episode list empty; the selection still moves to episode 1.
    pub async fn change_season(&mut self, source: &dyn MetadataSource, season: u32) {
        let media = self.media();
        self.selection.select_season(season);
        if media.kind != MediaKind::Tv {
            return;
        }
        self.episodes = source
            .season_episodes(media.id, season)
            .await
            .unwrap_or_else(|e| {
                warn!(media = %media, season, error = %e, "episodes unavailable");
                Vec::new()
            });
    }

    pub fn current_url(&self) -> String {
        self.selection.current_url()
    }
}
