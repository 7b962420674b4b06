use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Content category, used both as the discovery endpoint segment and as
/// half of an item's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Movie, MediaKind::Tv];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry parsed from one discovery/search/recommendation result.
///
/// Identity is `(kind, id)`: a movie and a series may share a numeric id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// `release_date` for movies, `first_air_date` for series.
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub genre_ids: Vec<u32>,
}

impl MediaItem {
    pub fn key(&self) -> (MediaKind, u64) {
        (self.kind, self.id)
    }

    pub fn media_ref(&self) -> MediaRef {
        MediaRef {
            kind: self.kind,
            id: self.id,
        }
    }

    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| d.year())
            .ok()
            .or_else(|| date.get(..4).and_then(|y| y.parse().ok()))
    }
}

/// Provider-agnostic reference to a playable title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub id: u64,
}

impl MediaRef {
    pub fn new(kind: MediaKind, id: u64) -> Self {
        Self { kind, id }
    }
}

impl std::fmt::Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

/// A video entry from the videos endpoint. Only `key` is needed to embed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub key: String,
    pub name: Option<String>,
    pub site: String,
    pub video_type: String,
    pub official: bool,
}

impl Trailer {
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub season_number: u32,
    pub name: String,
    pub episode_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_number: u32,
    pub name: String,
    pub runtime_minutes: Option<u32>,
    pub air_date: Option<String>,
}
