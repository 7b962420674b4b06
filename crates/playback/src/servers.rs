//! Static registry of third-party embed servers.
//!
//! Every server builds its URL differently; there is no common grammar, so
//! each entry carries its own template function. Nothing here touches the
//! network.

use reelgrid_core::{MediaKind, MediaRef};
use serde::Serialize;

type UrlTemplate = fn(MediaRef, u32, u32) -> String;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlaybackServer {
    pub name: &'static str,
    pub host: &'static str,
    #[serde(skip)]
    url_template: UrlTemplate,
    /// Whether the embed still plays inside a sandboxed iframe.
    pub sandbox_supported: bool,
    pub recommended: bool,
    pub description: &'static str,
}

impl PlaybackServer {
    /// Season and episode are ignored for movies.
    pub fn url(&self, media: MediaRef, season: u32, episode: u32) -> String {
        (self.url_template)(media, season, episode)
    }
}

pub static SERVERS: &[PlaybackServer] = &[
    PlaybackServer {
        name: "Server 1",
        host: "vidsrc.to",
        url_template: |m, s, e| match m.kind {
            MediaKind::Movie => format!("https://vidsrc.to/embed/movie/{}/", m.id),
            MediaKind::Tv => format!("https://vidsrc.to/embed/tv/{}/{s}-{e}", m.id),
        },
        sandbox_supported: false,
        recommended: false,
        description: "Large library, popup ads",
    },
    PlaybackServer {
        name: "Server 2",
        host: "vidsrc.net",
        url_template: |m, s, e| match m.kind {
            MediaKind::Movie => format!("https://vidsrc.net/embed/movie/?tmdb={}", m.id),
            MediaKind::Tv => format!(
                "https://vidsrc.net/embed/tv/?tmdb={}&season={s}&episode={e}",
                m.id
            ),
        },
        sandbox_supported: true,
        recommended: false,
        description: "Query-string player, works sandboxed",
    },
    PlaybackServer {
        name: "Server 3",
        host: "player.videasy.net",
        url_template: |m, s, e| slash_path("https://player.videasy.net", m, s, e),
        sandbox_supported: true,
        recommended: true,
        description: "Fast start, few ads",
    },
    PlaybackServer {
        name: "Server 4",
        host: "2embed.cc",
        url_template: |m, s, e| slash_path("https://www.2embed.cc/embed", m, s, e),
        sandbox_supported: false,
        recommended: false,
        description: "Fallback mirror",
    },
    PlaybackServer {
        name: "Server 5",
        host: "vidlink.pro",
        url_template: |m, s, e| slash_path("https://vidlink.pro/embed", m, s, e),
        sandbox_supported: true,
        recommended: true,
        description: "Multiple qualities and subtitles",
    },
    PlaybackServer {
        name: "Server 6",
        host: "vidsrc.xyz",
        url_template: |m, s, e| slash_path("https://vidsrc.xyz/embed", m, s, e),
        sandbox_supported: false,
        recommended: false,
        description: "Mirror of server 1",
    },
    PlaybackServer {
        name: "Server 7",
        host: "vidsrc.cc",
        url_template: |m, s, e| slash_path("https://vidsrc.cc/v2/embed", m, s, e),
        sandbox_supported: true,
        recommended: false,
        description: "Newer player, occasional gaps in catalog",
    },
];

/// `{base}/{kind}/{id}` with `/{season}/{episode}` appended for series.
fn slash_path(base: &str, media: MediaRef, season: u32, episode: u32) -> String {
    match media.kind {
        MediaKind::Movie => format!("{base}/movie/{}", media.id),
        MediaKind::Tv => format!("{base}/tv/{}/{season}/{episode}", media.id),
    }
}

/// # Panics
///
/// Panics if `index` is not a registry position. Indices come from the
/// registry itself, so an out-of-range value is a caller bug.
pub fn server(index: usize) -> &'static PlaybackServer {
    match SERVERS.get(index) {
        Some(server) => server,
        None => panic!(
            "playback server index {index} out of range (registry has {})",
            SERVERS.len()
        ),
    }
}

/// # Panics
///
/// Panics if `index` is out of range, see [`server`].
pub fn resolve_url(index: usize, media: MediaRef, season: u32, episode: u32) -> String {
    server(index).url(media, season, episode)
}

/// One registry entry resolved for a concrete title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedServer {
    pub index: usize,
    pub name: &'static str,
    pub url: String,
    pub sandbox_supported: bool,
    pub recommended: bool,
}

/// Every server's URL, in registry order.
pub fn resolve_all(media: MediaRef, season: u32, episode: u32) -> Vec<ResolvedServer> {
    SERVERS
        .iter()
        .enumerate()
        .map(|(index, s)| ResolvedServer {
            index,
            name: s.name,
            url: s.url(media, season, episode),
            sandbox_supported: s.sandbox_supported,
            recommended: s.recommended,
        })
        .collect()
}
