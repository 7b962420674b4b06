//! Static registry of streaming platforms used as catalog filters.

use serde::Serialize;

use crate::CatalogError;

/// A streaming platform and the regions its catalog is queried in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamingProvider {
    /// Watch-provider id understood by the metadata API.
    pub id: u32,
    pub slug: &'static str,
    pub name: &'static str,
    pub logo: &'static str,
    /// Every discovery request is fanned out once per region.
    pub regions: &'static [&'static str],
}

const US_ONLY: &[&str] = &["US"];

pub static PROVIDERS: &[StreamingProvider] = &[
    StreamingProvider {
        id: 8,
        slug: "netflix",
        name: "Netflix",
        logo: "https://upload.wikimedia.org/wikipedia/commons/7/7a/Logonetflix.png",
        regions: US_ONLY,
    },
    StreamingProvider {
        id: 337,
        slug: "disney",
        name: "Disney+",
        logo: "/provider/disney_plus.png",
        regions: US_ONLY,
    },
    StreamingProvider {
        id: 9,
        slug: "prime-video",
        name: "Prime Video",
        logo: "/provider/prime_video.png",
        regions: US_ONLY,
    },
    StreamingProvider {
        id: 350,
        slug: "apple-tv",
        name: "Apple TV+",
        logo: "/provider/apple_tv_plus.png",
        regions: US_ONLY,
    },
    StreamingProvider {
        id: 1899,
        slug: "hbo",
        name: "HBO Max",
        logo: "/provider/hbo_max.png",
        regions: US_ONLY,
    },
    StreamingProvider {
        id: 158,
        slug: "viu",
        name: "VIU",
        logo: "/provider/viu.png",
        regions: &["HK", "SG", "MY", "PH", "IN"],
    },
];

pub fn find_by_id(id: u32) -> Option<&'static StreamingProvider> {
    PROVIDERS.iter().find(|p| p.id == id)
}

pub fn find_by_slug(slug: &str) -> Option<&'static StreamingProvider> {
    PROVIDERS.iter().find(|p| p.slug.eq_ignore_ascii_case(slug))
}

/// Resolve either a slug (`netflix`) or a numeric provider id (`8`).
pub fn lookup(key: &str) -> Option<&'static StreamingProvider> {
    match key.parse::<u32>() {
        Ok(id) => find_by_id(id),
        Err(_) => find_by_slug(key),
    }
}

/// [`lookup`] that reports a miss as [`CatalogError::UnknownProvider`].
pub fn require(key: &str) -> Result<&'static StreamingProvider, CatalogError> {
    lookup(key).ok_or_else(|| CatalogError::UnknownProvider(key.to_string()))
}
