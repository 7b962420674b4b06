//! Data behind the detail overlay: genre names, top cast and a trailer.
//!
//! The three lookups are independent. Cast and trailer are fetched
//! concurrently and each falls back to empty on failure.

use reelgrid_core::{CastMember, MediaItem, Trailer};
use reelgrid_metadata::MetadataSource;
use serde::Serialize;
use tracing::warn;

use crate::genres::GenreDirectory;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDetails {
    pub item: MediaItem,
    pub genres: Vec<String>,
    pub cast: Vec<CastMember>,
    pub trailer: Option<Trailer>,
}

pub async fn load_item_details(
    source: &dyn MetadataSource,
    genres: &GenreDirectory,
    item: &MediaItem,
    cast_limit: usize,
) -> ItemDetails {
    let media = item.media_ref();
    let (cast, videos) = tokio::join!(source.credits(media), source.videos(media));

    let cast = match cast {
        Ok(mut cast) => {
            cast.truncate(cast_limit);
            cast
        }
        Err(e) => {
            warn!(media = %media, error = %e, "cast unavailable");
            Vec::new()
        }
    };

    let trailer = match videos {
        Ok(videos) => pick_trailer(&videos),
        Err(e) => {
            warn!(media = %media, error = %e, "trailer unavailable");
            None
        }
    };

    ItemDetails {
        item: item.clone(),
        genres: genres.names_for(item),
        cast,
        trailer,
    }
}

/// Prefer an official YouTube trailer, then any YouTube trailer.
pub fn pick_trailer(videos: &[Trailer]) -> Option<Trailer> {
    let is_yt_trailer = |v: &&Trailer| v.video_type == "Trailer" && v.site == "YouTube";
    videos
        .iter()
        .filter(is_yt_trailer)
        .find(|v| v.official)
        .or_else(|| videos.iter().find(is_yt_trailer))
        .cloned()
}
