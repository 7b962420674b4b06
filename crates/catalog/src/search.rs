//! Free-text title search across movies and series.

use reelgrid_core::MediaItem;
use reelgrid_metadata::MetadataSource;
use tracing::{debug, warn};

use crate::DedupIndex;

/// Blank queries return nothing without a request. A failed search is
/// reported as no results.
pub async fn search_titles(source: &dyn MetadataSource, query: &str) -> Vec<MediaItem> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    match source.search(query).await {
        Ok(results) => {
            let mut seen = DedupIndex::new();
            let hits: Vec<MediaItem> = results
                .into_iter()
                .filter(|item| seen.insert(item.kind, item.id))
                .collect();
            debug!(query, hits = hits.len(), "search finished");
            hits
        }
        Err(e) => {
            warn!(query, source = source.name(), error = %e, "search failed");
            Vec::new()
        }
    }
}
