use crate::engine::PageWindow;
use std::collections::HashMap;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub offset: u64,
    pub page_size: usize,
    /// `None` until a count lookup succeeds.
    pub total: Option<u64>,
}

impl PageState {
    fn new(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size,
            total: None,
        }
    }
}

/// Paging bookkeeping per resource name, plus the one-shot cursor carried across a page flip.
#[derive(Debug, Clone)]
pub struct PaginationManager {
    pages: HashMap<String, PageState>,
    page_size: usize,
    pending_cursor: Option<usize>,
}

impl Default for PaginationManager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationManager {
    pub fn new(page_size: usize) -> Self {
        Self {
            pages: HashMap::new(),
            page_size: page_size.max(1),
            pending_cursor: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Follows the viewport; every known resource picks up the new size.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        for state in self.pages.values_mut() {
            state.page_size = self.page_size;
        }
    }

    pub fn state(&self, resource: &str) -> PageState {
        self.pages
            .get(resource)
            .copied()
            .unwrap_or_else(|| PageState::new(self.page_size))
    }

    fn entry(&mut self, resource: &str) -> &mut PageState {
        let page_size = self.page_size;
        self.pages
            .entry(resource.to_string())
            .or_insert_with(|| PageState::new(page_size))
    }

    pub fn window(&mut self, resource: &str) -> PageWindow {
        let state = self.entry(resource);
        PageWindow {
            offset: state.offset,
            limit: state.page_size,
        }
    }

    /// Moves one page forward. With a known total the offset never passes the last page.
    /// Returns whether the offset changed; only then is `cursor` kept for the refetch.
    pub fn page_forward(&mut self, resource: &str, cursor: usize) -> bool {
        let state = self.entry(resource);
        let before = state.offset;
        let size = state.page_size as u64;
        let mut offset = before + size;
        if let Some(total) = state.total {
            if offset >= total {
                offset = total.saturating_sub(size);
            }
        }
        state.offset = offset;
        self.remember_cursor(before != offset, cursor)
    }

    pub fn page_back(&mut self, resource: &str, cursor: usize) -> bool {
        let state = self.entry(resource);
        let before = state.offset;
        state.offset = before.saturating_sub(state.page_size as u64);
        let changed = before != state.offset;
        self.remember_cursor(changed, cursor)
    }

    fn remember_cursor(&mut self, changed: bool, cursor: usize) -> bool {
        if changed {
            self.pending_cursor = Some(cursor);
        }
        changed
    }

    /// Requests a cursor position for the next applied result without moving pages.
    pub fn request_cursor(&mut self, cursor: usize) {
        self.pending_cursor = Some(cursor);
    }

    pub fn pending_cursor(&self) -> Option<usize> {
        self.pending_cursor
    }

    /// Consumes the pending cursor, clamped to the rows that arrived.
    pub fn take_pending_cursor(&mut self, row_count: usize) -> Option<usize> {
        self.pending_cursor
            .take()
            .map(|cursor| cursor.min(row_count.saturating_sub(1)))
    }

    pub fn clear_pending_cursor(&mut self) {
        self.pending_cursor = None;
    }

    /// A missing count leaves the total unknown rather than failing anything.
    pub fn record_total(&mut self, resource: &str, total: Option<u64>) {
        self.entry(resource).total = total;
    }

    pub fn reset(&mut self, resource: &str) {
        let page_size = self.page_size;
        self.pages
            .insert(resource.to_string(), PageState::new(page_size));
    }

    pub fn reset_all(&mut self) {
        self.pages.clear();
        self.pending_cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCE: &str = "process-instances";

    #[test]
    fn forward_then_back_returns_to_the_first_page() {
        for size in [1usize, 3, 10, 57] {
            let mut pages = PaginationManager::new(size);
            assert!(pages.page_forward(RESOURCE, 0));
            assert!(pages.page_back(RESOURCE, 0));
            assert_eq!(pages.state(RESOURCE).offset, 0);
        }
    }

    #[test]
    fn back_on_the_first_page_is_a_no_op() {
        let mut pages = PaginationManager::new(10);
        assert!(!pages.page_back(RESOURCE, 4));
        assert_eq!(pages.pending_cursor(), None);
    }

    #[test]
    fn forward_is_clamped_to_the_last_page_when_total_is_known() {
        let mut pages = PaginationManager::new(10);
        pages.record_total(RESOURCE, Some(25));
        pages.page_forward(RESOURCE, 0);
        pages.page_forward(RESOURCE, 0);
        assert_eq!(pages.state(RESOURCE).offset, 20);
        pages.page_forward(RESOURCE, 0);
        assert_eq!(pages.state(RESOURCE).offset, 15);
        for _ in 0..5 {
            pages.page_forward(RESOURCE, 0);
            assert!(pages.state(RESOURCE).offset < 25);
        }
    }

    #[test]
    fn unknown_total_skips_clamping() {
        let mut pages = PaginationManager::new(10);
        pages.record_total(RESOURCE, None);
        for _ in 0..4 {
            pages.page_forward(RESOURCE, 0);
        }
        assert_eq!(pages.state(RESOURCE).offset, 40);
    }

    #[test]
    fn small_collections_stay_on_the_first_page() {
        let mut pages = PaginationManager::new(10);
        pages.record_total(RESOURCE, Some(4));
        assert!(!pages.page_forward(RESOURCE, 2));
        assert_eq!(pages.state(RESOURCE).offset, 0);
        assert_eq!(pages.pending_cursor(), None);
    }

    #[test]
    fn pending_cursor_is_clamped_and_consumed_once() {
        let mut pages = PaginationManager::new(10);
        pages.page_forward(RESOURCE, 7);
        assert_eq!(pages.take_pending_cursor(3), Some(2));
        assert_eq!(pages.take_pending_cursor(3), None);

        pages.page_back(RESOURCE, 7);
        assert_eq!(pages.take_pending_cursor(10), Some(7));
        pages.request_cursor(5);
        assert_eq!(pages.take_pending_cursor(0), Some(0));
    }

    #[test]
    fn resources_page_independently() {
        let mut pages = PaginationManager::new(5);
        pages.page_forward("task", 0);
        pages.page_forward(RESOURCE, 0);
        pages.page_forward(RESOURCE, 0);
        assert_eq!(pages.window("task").offset, 5);
        assert_eq!(pages.window(RESOURCE).offset, 10);
        pages.reset(RESOURCE);
        assert_eq!(pages.window(RESOURCE).offset, 0);
        assert_eq!(pages.window("task").offset, 5);
        pages.reset_all();
        assert_eq!(pages.window("task").offset, 0);
    }

    #[test]
    fn page_size_follows_the_viewport() {
        let mut pages = PaginationManager::new(10);
        pages.window(RESOURCE);
        pages.set_page_size(0);
        assert_eq!(pages.window(RESOURCE).limit, 1);
        pages.set_page_size(18);
        assert_eq!(pages.window(RESOURCE).limit, 18);
        assert_eq!(pages.window("job").limit, 18);
    }
}
