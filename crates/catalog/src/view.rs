//! State behind one mounted provider page.
//!
//! A view owns its merged lists, cursors and dedup indexes. Nothing is
//! shared across views, so returning to a provider re-runs the initial
//! batch. After `teardown` every in-flight fetch is dropped and any late
//! result is discarded without touching the retained state.

use std::sync::Arc;

use reelgrid_core::{MediaItem, MediaKind, ViewError};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregator::{Aggregator, CatalogScope, merge_pages};
use crate::cursor::PageCursor;
use crate::dedup::DedupIndex;
use crate::PerKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum ViewStatus {
    Loading,
    Ready,
    Failed(ViewError),
}

/// Whether a completed fetch was applied to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "appended", rename_all = "snake_case")]
pub enum LoadMoreResult {
    Appended(usize),
    /// Loading already, exhausted, or the view is not ready.
    Skipped,
    /// Fetch failed; the cursor is back at its previous page.
    Failed,
    /// The view was torn down before the fetch resolved.
    Discarded,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub view_id: Uuid,
    pub provider_id: u32,
    pub status: ViewStatus,
    pub movies: Vec<MediaItem>,
    pub tv_shows: Vec<MediaItem>,
    pub cursors: PerKind<PageCursor>,
}

struct ViewState {
    status: ViewStatus,
    items: PerKind<Vec<MediaItem>>,
    seen: PerKind<DedupIndex>,
    cursors: PerKind<PageCursor>,
}

pub struct ProviderView {
    id: Uuid,
    scope: CatalogScope,
    aggregator: Arc<Aggregator>,
    state: Mutex<ViewState>,
    cancel: CancellationToken,
}

impl ProviderView {
    pub fn mount(aggregator: Arc<Aggregator>, scope: CatalogScope) -> Self {
        let id = Uuid::new_v4();
        debug!(view = %id, provider = scope.provider_id, "provider view mounted");
        Self {
            id,
            scope,
            aggregator,
            state: Mutex::new(ViewState {
                status: ViewStatus::Loading,
                items: PerKind::default(),
                seen: PerKind::default(),
                cursors: PerKind::default(),
            }),
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scope(&self) -> &CatalogScope {
        &self.scope
    }

    /// Token cancelled on teardown. Timers tied to this view (carousel,
    /// progress ticks) should run under it.
    pub fn child_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn teardown(&self) {
        if !self.cancel.is_cancelled() {
            info!(view = %self.id, provider = self.scope.provider_id, "provider view torn down");
            self.cancel.cancel();
        }
    }

    /// Run the initial batch and replace the view's contents with it.
    ///
    /// A failed batch leaves the view in `Failed` with nothing merged.
    pub async fn load_initial(&self) -> Result<Delivery, ViewError> {
        let result = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!(view = %self.id, "initial batch abandoned after teardown");
                return Ok(Delivery::Discarded);
            }
            r = self.aggregator.fetch_initial_batch(&self.scope) => r,
        };

        let mut state = self.state.lock().await;
        if self.cancel.is_cancelled() {
            return Ok(Delivery::Discarded);
        }

        match result {
            Ok(batch) => {
                state.seen = PerKind::new(
                    DedupIndex::seeded_from(&batch.movies),
                    DedupIndex::seeded_from(&batch.tv_shows),
                );
                state.items = PerKind::new(batch.movies, batch.tv_shows);
                state.cursors = batch.cursors;
                state.status = ViewStatus::Ready;
                Ok(Delivery::Applied)
            }
            Err(e) => {
                warn!(view = %self.id, provider = self.scope.provider_id, error = %e, "catalog failed to load");
                let err = ViewError::LoadingFailed(e.to_string());
                state.status = ViewStatus::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Append the next span of pages for `kind`.
    ///
    /// The guard is checked and the cursor moved to `Loading` under the
    /// state lock, so overlapping calls for the same kind start one fetch.
    pub async fn load_more(&self, kind: MediaKind) -> LoadMoreResult {
        let span_len = self.aggregator.config().load_more_span;
        let span = {
            let mut state = self.state.lock().await;
            if self.cancel.is_cancelled() {
                return LoadMoreResult::Discarded;
            }
            if state.status != ViewStatus::Ready {
                return LoadMoreResult::Skipped;
            }
            match state.cursors.get_mut(kind).begin_load_more(span_len) {
                Some(span) => span,
                None => return LoadMoreResult::Skipped,
            }
        };

        let result = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!(view = %self.id, kind = %kind, "load more abandoned after teardown");
                return LoadMoreResult::Discarded;
            }
            r = self.aggregator.fetch_span(&self.scope, kind, span) => r,
        };

        let mut guard = self.state.lock().await;
        if self.cancel.is_cancelled() {
            return LoadMoreResult::Discarded;
        }
        let state = &mut *guard;

        match result {
            Ok(pages) => {
                let new_items = merge_pages(kind, &pages, state.seen.get_mut(kind));
                let appended = new_items.len();
                state.items.get_mut(kind).extend(new_items);
                state.cursors.get_mut(kind).complete(span);
                debug!(view = %self.id, kind = %kind, appended, page = span.last, "load more merged");
                LoadMoreResult::Appended(appended)
            }
            Err(e) => {
                state.cursors.get_mut(kind).abort();
                warn!(view = %self.id, kind = %kind, error = %e, "load more failed");
                LoadMoreResult::Failed
            }
        }
    }

    /// Up to `rounds` passes of [`load_more`](Self::load_more) over
    /// `kinds`. The first failure ends every remaining round.
    pub async fn load_more_rounds(&self, kinds: &[MediaKind], rounds: u32) -> Vec<LoadMoreResult> {
        let mut results = Vec::new();
        'rounds: for round in 0..rounds {
            for &kind in kinds {
                let result = self.load_more(kind).await;
                debug!(view = %self.id, round, kind = %kind, result = ?result, "load more round");
                results.push(result);
                if result == LoadMoreResult::Failed {
                    break 'rounds;
                }
            }
        }
        results
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.state.lock().await;
        ViewSnapshot {
            view_id: self.id,
            provider_id: self.scope.provider_id,
            status: state.status.clone(),
            movies: state.items.movie.clone(),
            tv_shows: state.items.tv.clone(),
            cursors: state.cursors,
        }
    }
}

impl Drop for ProviderView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::Semaphore;

    use super::*;
    use crate::providers;
    use crate::testing::{FakeCatalog, ids};
    use crate::AggregatorConfig;

    fn scope(slug: &str) -> CatalogScope {
        CatalogScope::for_provider(providers::find_by_slug(slug).unwrap())
    }

    fn mount(fake: Arc<FakeCatalog>, slug: &str) -> Arc<ProviderView> {
        let aggregator = Arc::new(Aggregator::new(fake, AggregatorConfig::default()));
        Arc::new(ProviderView::mount(aggregator, scope(slug)))
    }

    fn populated() -> FakeCatalog {
        FakeCatalog::new()
            .page(MediaKind::Movie, 1, &[1, 2])
            .page(MediaKind::Movie, 2, &[3])
            .page(MediaKind::Movie, 6, &[2, 6])
            .page(MediaKind::Movie, 7, &[7])
            .page(MediaKind::Tv, 1, &[1, 100])
            .total(MediaKind::Movie, 20)
            .total(MediaKind::Tv, 3)
    }

    #[tokio::test]
    async fn load_initial_then_more() {
        let fake = Arc::new(populated());
        let view = mount(fake.clone(), "netflix");

        assert_eq!(view.load_initial().await, Ok(Delivery::Applied));
        assert_eq!(view.load_more(MediaKind::Movie).await, LoadMoreResult::Appended(2));

        let snap = view.snapshot().await;
        assert_eq!(snap.status, ViewStatus::Ready);
        assert_eq!(ids(&snap.movies), vec![1, 2, 3, 6, 7]);
        assert_eq!(ids(&snap.tv_shows), vec![1, 100]);
        assert_eq!(snap.cursors.movie.current_page(), 8);

        // TV is exhausted after the initial batch.
        let before = fake.call_count();
        assert_eq!(view.load_more(MediaKind::Tv).await, LoadMoreResult::Skipped);
        assert_eq!(fake.call_count(), before);
    }

    #[tokio::test]
    async fn failure_ends_all_remaining_rounds() {
        let fake = Arc::new(populated().fail(MediaKind::Movie, 6));
        let view = mount(fake.clone(), "netflix");
        view.load_initial().await.unwrap();

        let results = view
            .load_more_rounds(&[MediaKind::Movie, MediaKind::Tv], 3)
            .await;
        assert_eq!(results, vec![LoadMoreResult::Failed]);
        let page_six = fake
            .calls()
            .iter()
            .filter(|q| q.kind == MediaKind::Movie && q.page == 6)
            .count();
        assert_eq!(page_six, 1);
        assert_eq!(view.snapshot().await.cursors.movie.current_page(), 5);
    }

    #[tokio::test]
    async fn rounds_alternate_kinds_until_done() {
        let fake = Arc::new(populated());
        let view = mount(fake, "netflix");
        view.load_initial().await.unwrap();

        let results = view
            .load_more_rounds(&[MediaKind::Movie, MediaKind::Tv], 2)
            .await;
        assert_eq!(
            results,
            vec![
                LoadMoreResult::Appended(2),
                LoadMoreResult::Skipped,
                LoadMoreResult::Appended(0),
                LoadMoreResult::Skipped,
            ]
        );
    }

    #[tokio::test]
    async fn load_more_before_ready_is_skipped() {
        let fake = Arc::new(populated());
        let view = mount(fake.clone(), "netflix");
        assert_eq!(view.load_more(MediaKind::Movie).await, LoadMoreResult::Skipped);
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn failed_initial_batch_merges_nothing() {
        let fake = Arc::new(populated().fail(MediaKind::Tv, 3));
        let view = mount(fake, "netflix");

        let err = view.load_initial().await.unwrap_err();
        assert_eq!(err.code(), "loading_failed");

        let snap = view.snapshot().await;
        assert!(matches!(snap.status, ViewStatus::Failed(_)));
        assert!(snap.movies.is_empty());
        assert!(snap.tv_shows.is_empty());
        assert_eq!(snap.cursors.movie, PageCursor::new());
    }

    #[tokio::test]
    async fn overlapping_load_more_starts_one_fetch() {
        let gate = Arc::new(Semaphore::new(0));
        let fake = Arc::new(populated().gated(gate.clone(), 6));
        let view = mount(fake.clone(), "netflix");
        view.load_initial().await.unwrap();
        let after_initial = fake.call_count();

        let first = tokio::spawn({
            let view = view.clone();
            async move { view.load_more(MediaKind::Movie).await }
        });
        fake.wait_for_calls(after_initial + 3).await;

        assert_eq!(view.load_more(MediaKind::Movie).await, LoadMoreResult::Skipped);
        assert_eq!(fake.call_count(), after_initial + 3);

        gate.add_permits(3);
        assert_eq!(first.await.unwrap(), LoadMoreResult::Appended(2));
        assert_eq!(fake.call_count(), after_initial + 3);
    }

    #[tokio::test]
    async fn stale_initial_batch_is_discarded() {
        let gate = Arc::new(Semaphore::new(0));
        let fake = Arc::new(populated().gated(gate.clone(), 1));
        let view = mount(fake.clone(), "netflix");

        let pending = tokio::spawn({
            let view = view.clone();
            async move { view.load_initial().await }
        });
        fake.wait_for_calls(10).await;

        view.teardown();
        gate.add_permits(100);

        assert_eq!(pending.await.unwrap(), Ok(Delivery::Discarded));
        let snap = view.snapshot().await;
        assert_eq!(snap.status, ViewStatus::Loading);
        assert!(snap.movies.is_empty());
        assert_eq!(snap.cursors.movie, PageCursor::new());
    }

    #[tokio::test]
    async fn stale_load_more_is_discarded() {
        let gate = Arc::new(Semaphore::new(0));
        let fake = Arc::new(populated().gated(gate.clone(), 6));
        let view = mount(fake.clone(), "netflix");
        view.load_initial().await.unwrap();
        let before = view.snapshot().await;
        let after_initial = fake.call_count();

        let pending = tokio::spawn({
            let view = view.clone();
            async move { view.load_more(MediaKind::Movie).await }
        });
        fake.wait_for_calls(after_initial + 3).await;

        view.teardown();
        gate.add_permits(3);

        assert_eq!(pending.await.unwrap(), LoadMoreResult::Discarded);
        let after = view.snapshot().await;
        assert_eq!(ids(&after.movies), ids(&before.movies));
        assert_eq!(after.cursors.movie.current_page(), 5);

        // Further calls on a torn-down view do nothing.
        assert_eq!(view.load_more(MediaKind::Movie).await, LoadMoreResult::Discarded);
    }

    #[tokio::test]
    async fn child_token_follows_teardown() {
        let view = mount(Arc::new(populated()), "netflix");
        let token = view.child_token();
        assert!(!token.is_cancelled());
        view.teardown();
        assert!(token.is_cancelled());
        assert!(view.is_torn_down());
    }

    #[tokio::test]
    async fn provider_views_do_not_share_state() {
        let fake = Arc::new(populated());
        let netflix = mount(fake.clone(), "netflix");
        let prime = mount(fake, "prime-video");
        netflix.load_initial().await.unwrap();
        prime.load_initial().await.unwrap();

        netflix.load_more(MediaKind::Movie).await;
        netflix.teardown();

        let p = prime.snapshot().await;
        assert_eq!(p.status, ViewStatus::Ready);
        assert_eq!(p.cursors.movie.current_page(), 5);
        assert_eq!(ids(&p.movies), vec![1, 2, 3]);
        // Movie 1 and series 1 coexist within one view.
        assert!(p.movies.iter().any(|i| i.id == 1) && p.tv_shows.iter().any(|i| i.id == 1));
    }
}
