//! TMDB (The Movie Database) client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use reelgrid_core::{CastMember, Episode, MediaItem, MediaKind, MediaRef, Season, Trailer};
use tracing::debug;

use crate::provider::{DiscoverSource, MetadataSource};
use crate::{
    CatalogConfig, DiscoverPage, DiscoverQuery, Genre, ItemDetail, MAX_DISCOVER_PAGE,
    MetadataError,
};

pub struct TmdbClient {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(config: CatalogConfig) -> Result<Self, MetadataError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, MetadataError> {
        let mut all_params = Vec::with_capacity(params.len() + 1);
        if let Some(ref key) = self.config.api_key {
            all_params.push(("api_key", key.as_str()));
        }
        all_params.extend_from_slice(params);

        let url = format!("{}{path}", self.config.api_base.trim_end_matches('/'));
        debug!(url = %url, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(MetadataError::Status(resp.status().as_u16()));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))
    }
}

#[async_trait::async_trait]
impl DiscoverSource for TmdbClient {
    async fn discover(&self, query: &DiscoverQuery) -> Result<DiscoverPage, MetadataError> {
        let provider = query.provider_id.to_string();
        let page = query.page.to_string();
        let genre = query.genre.map(|g| g.to_string());

        let mut params = vec![
            ("with_watch_providers", provider.as_str()),
            ("watch_region", query.region.as_str()),
            ("sort_by", "popularity.desc"),
            ("page", page.as_str()),
        ];
        if let Some(ref g) = genre {
            params.push(("with_genres", g.as_str()));
        }

        let data = self
            .get_json(&format!("/discover/{}", query.kind), &params)
            .await?;

        Ok(parse_discover_page(&data, query.kind, query.page))
    }
}

#[async_trait::async_trait]
impl MetadataSource for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn details(&self, media: MediaRef) -> Result<ItemDetail, MetadataError> {
        let data = self
            .get_json(&format!("/{}/{}", media.kind, media.id), &[])
            .await?;
        parse_item_detail(&data, media.kind)
            .ok_or_else(|| MetadataError::Provider("detail response missing id".into()))
    }

    async fn credits(&self, media: MediaRef) -> Result<Vec<CastMember>, MetadataError> {
        let data = self
            .get_json(&format!("/{}/{}/credits", media.kind, media.id), &[])
            .await?;
        Ok(parse_cast(&data))
    }

    async fn videos(&self, media: MediaRef) -> Result<Vec<Trailer>, MetadataError> {
        let data = self
            .get_json(&format!("/{}/{}/videos", media.kind, media.id), &[])
            .await?;
        Ok(parse_videos(&data))
    }

    async fn recommendations(&self, media: MediaRef) -> Result<Vec<MediaItem>, MetadataError> {
        let data = self
            .get_json(
                &format!("/{}/{}/recommendations", media.kind, media.id),
                &[],
            )
            .await?;
        let results = data["results"].as_array().cloned().unwrap_or_default();
        Ok(results
            .iter()
            .filter_map(|r| parse_tagged_item(r, Some(media.kind)))
            .collect())
    }

    async fn season_episodes(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Vec<Episode>, MetadataError> {
        let data = self
            .get_json(&format!("/tv/{series_id}/season/{season_number}"), &[])
            .await?;

        let episodes = data["episodes"].as_array().cloned().unwrap_or_default();

        Ok(episodes
            .iter()
            .map(|ep| Episode {
                episode_number: ep["episode_number"].as_u64().unwrap_or(0) as u32,
                name: ep["name"].as_str().unwrap_or("").to_string(),
                runtime_minutes: ep["runtime"].as_u64().map(|r| r as u32),
                air_date: ep["air_date"].as_str().map(|s| s.to_string()),
            })
            .collect())
    }

    async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, MetadataError> {
        let data = self.get_json(&format!("/genre/{kind}/list"), &[]).await?;
        Ok(parse_genres(&data["genres"]))
    }

    async fn search(&self, query: &str) -> Result<Vec<MediaItem>, MetadataError> {
        let data = self
            .get_json("/search/multi", &[("query", query), ("include_adult", "false")])
            .await?;
        let results = data["results"].as_array().cloned().unwrap_or_default();
        Ok(results
            .iter()
            .filter_map(|r| parse_tagged_item(r, None))
            .collect())
    }
}

/// Parse a list entry. The kind is stamped by the caller because the
/// discovery endpoints do not echo it back.
pub fn parse_media_item(r: &serde_json::Value, kind: MediaKind) -> Option<MediaItem> {
    let id = r["id"].as_u64()?;
    let (title_key, date_key) = match kind {
        MediaKind::Movie => ("title", "release_date"),
        MediaKind::Tv => ("name", "first_air_date"),
    };

    Some(MediaItem {
        id,
        kind,
        title: r[title_key]
            .as_str()
            .or_else(|| r["title"].as_str())
            .or_else(|| r["name"].as_str())
            .unwrap_or("Unknown")
            .to_string(),
        overview: r["overview"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        poster_path: r["poster_path"].as_str().map(|s| s.to_string()),
        backdrop_path: r["backdrop_path"].as_str().map(|s| s.to_string()),
        release_date: r[date_key]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        vote_average: r["vote_average"].as_f64(),
        genre_ids: r["genre_ids"]
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(|g| g.as_u64().map(|g| g as u32))
                    .collect()
            })
            .unwrap_or_default(),
    })
}

/// Parse an entry that carries its own `media_type` (search, recommendations).
/// Entries tagged with anything other than movie/tv are skipped.
fn parse_tagged_item(r: &serde_json::Value, fallback: Option<MediaKind>) -> Option<MediaItem> {
    let kind = match r["media_type"].as_str() {
        Some(t) => MediaKind::from_str(t)?,
        None => fallback?,
    };
    parse_media_item(r, kind)
}

pub fn parse_discover_page(data: &serde_json::Value, kind: MediaKind, page: u32) -> DiscoverPage {
    let results = data["results"].as_array().cloned().unwrap_or_default();
    let total_pages = data["total_pages"]
        .as_u64()
        .map(|t| t.clamp(1, MAX_DISCOVER_PAGE as u64) as u32)
        .unwrap_or(1);

    DiscoverPage {
        page: data["page"].as_u64().map(|p| p as u32).unwrap_or(page),
        total_pages,
        results: results
            .iter()
            .filter_map(|r| parse_media_item(r, kind))
            .collect(),
    }
}

fn parse_item_detail(data: &serde_json::Value, kind: MediaKind) -> Option<ItemDetail> {
    let genres = parse_genres(&data["genres"]);
    let mut item = parse_media_item(data, kind)?;
    // Detail responses carry `genres` objects instead of `genre_ids`.
    if item.genre_ids.is_empty() {
        item.genre_ids = genres.iter().map(|g| g.id).collect();
    }

    let runtime_minutes = match kind {
        MediaKind::Movie => data["runtime"].as_u64(),
        MediaKind::Tv => data["episode_run_time"]
            .as_array()
            .and_then(|a| a.first())
            .and_then(|v| v.as_u64()),
    }
    .map(|r| r as u32);

    let seasons = data["seasons"]
        .as_array()
        .map(|ss| {
            ss.iter()
                .map(|s| Season {
                    season_number: s["season_number"].as_u64().unwrap_or(0) as u32,
                    name: s["name"].as_str().unwrap_or("").to_string(),
                    episode_count: s["episode_count"].as_u64().unwrap_or(0) as u32,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(ItemDetail {
        item,
        genres,
        tagline: data["tagline"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        runtime_minutes,
        seasons,
    })
}

fn parse_genres(genres: &serde_json::Value) -> Vec<Genre> {
    genres
        .as_array()
        .map(|gs| {
            gs.iter()
                .filter_map(|g| {
                    Some(Genre {
                        id: g["id"].as_u64()? as u32,
                        name: g["name"].as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_cast(data: &serde_json::Value) -> Vec<CastMember> {
    data["cast"]
        .as_array()
        .map(|cast| {
            cast.iter()
                .map(|person| CastMember {
                    id: person["id"].as_u64().unwrap_or(0),
                    name: person["name"].as_str().unwrap_or("").to_string(),
                    character: person["character"]
                        .as_str()
                        .filter(|s| !s.is_empty())
                        .map(|s| s.to_string()),
                    profile_path: person["profile_path"].as_str().map(|s| s.to_string()),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_videos(data: &serde_json::Value) -> Vec<Trailer> {
    data["results"]
        .as_array()
        .map(|videos| {
            videos
                .iter()
                .filter_map(|v| {
                    Some(Trailer {
                        key: v["key"].as_str()?.to_string(),
                        name: v["name"].as_str().map(|s| s.to_string()),
                        site: v["site"].as_str().unwrap_or("").to_string(),
                        video_type: v["type"].as_str().unwrap_or("").to_string(),
                        official: v["official"].as_bool().unwrap_or(false),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
