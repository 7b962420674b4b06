//! Genre id → name lookup, one table per kind.
//!
//! Loaded once per session and then only read. A failed load leaves that
//! kind's table empty so items simply show no genre names.

use std::collections::HashMap;

use reelgrid_core::{MediaItem, MediaKind};
use reelgrid_metadata::{Genre, MetadataSource};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::PerKind;

#[derive(Debug, Clone, Default)]
pub struct GenreDirectory {
    tables: PerKind<HashMap<u32, String>>,
}

impl GenreDirectory {
    pub fn from_lists(movie: Vec<Genre>, tv: Vec<Genre>) -> Self {
        let table = |gs: Vec<Genre>| -> HashMap<u32, String> {
            gs.into_iter().map(|g| (g.id, g.name)).collect()
        };
        Self {
            tables: PerKind::new(table(movie), table(tv)),
        }
    }

    pub async fn load(source: &dyn MetadataSource) -> Self {
        let (movie, tv) = tokio::join!(
            source.genres(MediaKind::Movie),
            source.genres(MediaKind::Tv)
        );
        let movie = movie.unwrap_or_else(|e| {
            warn!(kind = "movie", error = %e, "genre list unavailable");
            Vec::new()
        });
        let tv = tv.unwrap_or_else(|e| {
            warn!(kind = "tv", error = %e, "genre list unavailable");
            Vec::new()
        });
        info!(movie = movie.len(), tv = tv.len(), "genre directory loaded");
        Self::from_lists(movie, tv)
    }

    pub fn name(&self, kind: MediaKind, id: u32) -> Option<&str> {
        self.tables.get(kind).get(&id).map(String::as_str)
    }

    /// Names for an item's genre ids in order, skipping unknown ids.
    pub fn names_for(&self, item: &MediaItem) -> Vec<String> {
        item.genre_ids
            .iter()
            .filter_map(|id| self.name(item.kind, *id))
            .map(str::to_string)
            .collect()
    }
}

/// Session-wide directory, fetched on first use.
#[derive(Debug, Default)]
pub struct SessionGenres {
    cell: OnceCell<GenreDirectory>,
}

impl SessionGenres {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_load(&self, source: &dyn MetadataSource) -> &GenreDirectory {
        self.cell
            .get_or_init(|| GenreDirectory::load(source))
            .await
    }
}
