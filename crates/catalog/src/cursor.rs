//! Pagination state for one (provider, kind) pair.
//!
//! A cursor is either idle at some page or loading the next span. Asking
//! for more while loading or exhausted is ignored rather than rejected, so
//! a double-clicked "load more" is harmless.

use std::ops::RangeInclusive;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    current_page: u32,
    total_pages: u32,
    is_loading_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Idle { page: u32, total_pages: u32 },
    Loading { page: u32, total_pages: u32 },
}

/// Contiguous run of pages requested by one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSpan {
    pub first: u32,
    pub last: u32,
}

impl PageSpan {
    pub fn pages(self) -> RangeInclusive<u32> {
        self.first..=self.last
    }

    pub fn page_count(self) -> u32 {
        self.last + 1 - self.first
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            current_page: 0,
            total_pages: 1,
            is_loading_more: false,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn state(&self) -> CursorState {
        if self.is_loading_more {
            CursorState::Loading {
                page: self.current_page,
                total_pages: self.total_pages,
            }
        } else {
            CursorState::Idle {
                page: self.current_page,
                total_pages: self.total_pages,
            }
        }
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn can_request_more(&self) -> bool {
        !self.is_loading_more && self.has_more()
    }

    /// Record the outcome of the initial batch. `total_pages` comes from
    /// the first page response; `fetched_through` is the last page asked for.
    pub fn initialize(&mut self, total_pages: u32, fetched_through: u32) {
        self.total_pages = total_pages.max(1);
        self.current_page = fetched_through.min(self.total_pages);
        self.is_loading_more = false;
    }

    /// The span a "load more" of `span` pages would request, if any.
    pub fn next_span(&self, span: u32) -> Option<PageSpan> {
        if !self.can_request_more() {
            return None;
        }
        let first = self.current_page + 1;
        let last = (self.current_page + span.max(1)).min(self.total_pages);
        Some(PageSpan { first, last })
    }

    /// Move to `Loading` and return the pages to fetch, or `None` when the
    /// request must be ignored.
    pub fn begin_load_more(&mut self, span: u32) -> Option<PageSpan> {
        let next = self.next_span(span)?;
        self.is_loading_more = true;
        Some(next)
    }

    pub fn complete(&mut self, span: PageSpan) {
        self.current_page = span.last.min(self.total_pages);
        self.is_loading_more = false;
    }

    /// Back to `Idle` at the pre-load page so the load can be retried.
    pub fn abort(&mut self) {
        self.is_loading_more = false;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
