use std::collections::HashSet;

use reelgrid_core::{MediaItem, MediaKind};

/// Set of `(kind, id)` pairs already placed in a view. Entries are never
/// removed.
#[derive(Debug, Clone, Default)]
pub struct DedupIndex {
    seen: HashSet<(MediaKind, u64)>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded_from<'a>(items: impl IntoIterator<Item = &'a MediaItem>) -> Self {
        Self {
            seen: items.into_iter().map(MediaItem::key).collect(),
        }
    }

    /// Returns `true` the first time a key is seen.
    pub fn insert(&mut self, kind: MediaKind, id: u64) -> bool {
        self.seen.insert((kind, id))
    }

    pub fn contains(&self, kind: MediaKind, id: u64) -> bool {
        self.seen.contains(&(kind, id))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
