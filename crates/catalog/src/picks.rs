//! Genre-filtered "picks" row for a single provider: one discovery page of
//! each kind, interleaved movie, series, movie, series.

use reelgrid_core::{MediaItem, MediaKind};
use reelgrid_metadata::{DiscoverQuery, DiscoverSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::providers::StreamingProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickGenre {
    Action,
    Romance,
    Comedy,
    Horror,
}

impl PickGenre {
    pub const ALL: [PickGenre; 4] = [
        PickGenre::Action,
        PickGenre::Romance,
        PickGenre::Comedy,
        PickGenre::Horror,
    ];

    /// Movie and series genre ids differ for the same label.
    pub fn genre_id(self, kind: MediaKind) -> u32 {
        match (self, kind) {
            (Self::Action, MediaKind::Movie) => 28,
            (Self::Action, MediaKind::Tv) => 10759,
            (Self::Romance, _) => 10749,
            (Self::Comedy, _) => 35,
            (Self::Horror, MediaKind::Movie) => 27,
            // No horror genre for series; mystery is the closest.
            (Self::Horror, MediaKind::Tv) => 9648,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Romance => "romance",
            Self::Comedy => "comedy",
            Self::Horror => "horror",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for PickGenre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetch the picks row. If either kind fails the row is empty, never half
/// filled.
pub async fn fetch_picks(
    source: &dyn DiscoverSource,
    provider: &StreamingProvider,
    genre: Option<PickGenre>,
    limit: usize,
) -> Vec<MediaItem> {
    let region = provider.regions.first().copied().unwrap_or("US");
    let query = |kind| DiscoverQuery {
        kind,
        provider_id: provider.id,
        region: region.to_string(),
        page: 1,
        genre: genre.map(|g| g.genre_id(kind)),
    };
    let movie_query = query(MediaKind::Movie);
    let tv_query = query(MediaKind::Tv);

    let (movies, shows) = tokio::join!(source.discover(&movie_query), source.discover(&tv_query));
    let (movies, shows) = match (movies, shows) {
        (Ok(movies), Ok(shows)) => (movies, shows),
        (Err(e), _) | (_, Err(e)) => {
            warn!(provider = provider.id, genre = ?genre, error = %e, "picks unavailable");
            return Vec::new();
        }
    };

    let picks = interleave(movies.results, shows.results, limit);
    debug!(provider = provider.id, genre = ?genre, picks = picks.len(), "picks fetched");
    picks
}

/// Alternate movie and series entries until `limit` or both run out.
pub fn interleave(movies: Vec<MediaItem>, shows: Vec<MediaItem>, limit: usize) -> Vec<MediaItem> {
    let mut out = Vec::with_capacity(limit.min(movies.len() + shows.len()));
    let mut movies = movies.into_iter().map(|mut m| {
        m.kind = MediaKind::Movie;
        m
    });
    let mut shows = shows.into_iter().map(|mut s| {
        s.kind = MediaKind::Tv;
        s
    });

    while out.len() < limit {
        let (m, s) = (movies.next(), shows.next());
        if m.is_none() && s.is_none() {
            break;
        }
        if let Some(m) = m {
            out.push(m);
        }
        if let Some(s) = s {
            if out.len() < limit {
                out.push(s);
            }
        }
    }
    out
}
