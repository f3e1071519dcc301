//! Pagination state and page-link generation.

use std::ops::Range;

use horizon_grid_core::logging::targets;

/// Page links are listed exhaustively below this many pages.
const FULL_LINK_LIMIT: usize = 12;
/// Pages shown on each side of the current page.
const NEAR_PAGES: usize = 5;
/// Only every n-th decimal step hit is shown.
const STEP_HIT_STRIDE: usize = 3;

/// Current page, page size, and "show all" mode.
///
/// Pages are numbered from 1. `current_page() == None` means all rows are
/// shown on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    page_size: usize,
    current: Option<usize>,
}

impl PageState {
    /// Creates a state on page 1 with the given page size (zero becomes one).
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: Some(1),
        }
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sets the rows per page (zero becomes one).
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// The current page, or `None` in show-all mode.
    pub fn current_page(&self) -> Option<usize> {
        self.current
    }

    /// Returns `true` in show-all mode.
    pub fn is_show_all(&self) -> bool {
        self.current.is_none()
    }

    /// Highest page number for `row_count` rows. An empty model still has
    /// page 1.
    pub fn max_page(&self, row_count: usize) -> usize {
        row_count.div_ceil(self.page_size).max(1)
    }

    /// Half-open range of display rows to show.
    ///
    /// Paging applies only when it is enabled and a concrete page is
    /// selected; otherwise every row is visible. The page is clamped into
    /// `1..=max_page` for the computation, so the range always lies within
    /// `0..row_count`.
    pub fn visible_window(&self, row_count: usize, paging_enabled: bool) -> Range<usize> {
        match self.current {
            Some(page) if paging_enabled => {
                let page = page.clamp(1, self.max_page(row_count));
                let start = ((page - 1) * self.page_size).min(row_count);
                let end = (start + self.page_size).min(row_count);
                start..end
            }
            _ => 0..row_count,
        }
    }

    /// Advances one page. Not clamped; see [`clamp`](Self::clamp).
    pub fn forward(&mut self) {
        if let Some(page) = self.current {
            self.current = Some(page.saturating_add(1));
        }
    }

    /// Goes back one page. Not clamped; see [`clamp`](Self::clamp).
    pub fn back(&mut self) {
        if let Some(page) = self.current {
            self.current = Some(page.saturating_sub(1));
        }
    }

    /// Jumps to `page`, clamped into `1..=max_page`. A link rendered before
    /// the model shrank lands on the last page that still exists.
    pub fn goto(&mut self, page: usize, row_count: usize) {
        let max = self.max_page(row_count);
        self.current = Some(page.clamp(1, max));
    }

    /// Switches to show-all mode.
    pub fn show_all(&mut self) {
        self.current = None;
    }

    /// Leaves show-all mode, returning to page 1.
    pub fn show_pages(&mut self) {
        self.current = Some(1);
    }

    /// Returns to page 1 unless in show-all mode.
    pub fn reset(&mut self) {
        if self.current.is_some() {
            self.current = Some(1);
        }
    }

    /// Clamps the current page into `1..=max_page`.
    pub fn clamp(&mut self, row_count: usize) {
        if let Some(page) = self.current {
            let clamped = page.clamp(1, self.max_page(row_count));
            if clamped != page {
                tracing::debug!(target: targets::PAGE, page, clamped, row_count, "clamped page");
                self.current = Some(clamped);
            }
        }
    }
}

/// Page numbers to offer as links, in ascending order.
///
/// With fewer than 12 pages every page is listed. Otherwise the list holds
/// the first and last page, the pages within five of `current` (the window
/// shifts near either end so it keeps its width), and a thinned-out series
/// of pages on decimal steps. The step starts at `10^(digits(max_page / 10) - 1)`,
/// shrinks tenfold whenever the walk comes within one step below `current`
/// and grows tenfold (up to `10^(digits(max_page) - 1)`) once the walk is
/// nine steps past it. Only every third step hit is kept.
pub fn page_links(current: usize, max_page: usize) -> Vec<usize> {
    let max_page = max_page.max(1);
    if max_page < FULL_LINK_LIMIT {
        return (1..=max_page).collect();
    }

    let current = current.clamp(1, max_page);
    let max_step = 10usize.pow(digits(max_page) - 1);
    let mut step = 10usize.pow(digits(max_page / 10) - 1);

    let (mut near_left, mut near_right) = (NEAR_PAGES, NEAR_PAGES);
    if current < near_left {
        near_left = current;
        near_right = 2 * NEAR_PAGES - near_left;
    } else if current + near_right > max_page {
        near_right = max_page - current;
        near_left = 2 * NEAR_PAGES - near_right;
    }

    let mut links = Vec::new();
    let mut step_hits = 0usize;
    for page in 1..=max_page {
        step = adapt_step(current, max_step, step, page);

        let mut is_step_hit = false;
        if page % step == 0 {
            is_step_hit = step_hits % STEP_HIT_STRIDE == 0;
            step_hits += 1;
        }
        let is_near = page + near_left >= current && page <= current + near_right;

        if page == 1 || page == max_page || is_step_hit || is_near {
            links.push(page);
        }
    }
    links
}

fn adapt_step(current: usize, max_step: usize, step: usize, page: usize) -> usize {
    if page < current && step > 1 && (current - page) / step == 0 {
        step / 10
    } else if page > current && step < max_step && (page - current) / step == 9 {
        step * 10
    } else {
        step
    }
}

fn digits(n: usize) -> u32 {
    n.max(1).ilog10() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_window_paged() {
        let page = PageState::new(10);
        assert_eq!(page.visible_window(25, true), 0..10);

        let mut page = PageState::new(10);
        page.goto(3, 25);
        assert_eq!(page.visible_window(25, true), 20..25);
    }

    #[test]
    fn test_visible_window_unpaged() {
        let mut page = PageState::new(10);
        page.goto(2, 25);
        assert_eq!(page.visible_window(25, false), 0..25);

        page.show_all();
        assert_eq!(page.visible_window(25, true), 0..25);
    }

    #[test]
    fn test_visible_window_empty_model() {
        let page = PageState::new(10);
        assert_eq!(page.visible_window(0, true), 0..0);
        assert_eq!(page.max_page(0), 1);
    }

    #[test]
    fn test_forward_back_are_unclamped_until_computed() {
        let mut page = PageState::new(10);
        page.back();
        assert_eq!(page.current_page(), Some(0));
        assert_eq!(page.visible_window(25, true), 0..10);

        page.clamp(25);
        assert_eq!(page.current_page(), Some(1));

        page.forward();
        page.forward();
        page.forward();
        assert_eq!(page.current_page(), Some(4));
        assert_eq!(page.visible_window(25, true), 20..25);
        page.clamp(25);
        assert_eq!(page.current_page(), Some(3));
    }

    #[test]
    fn test_goto_clamps_after_shrink() {
        let mut page = PageState::new(10);
        page.goto(9, 25);
        assert_eq!(page.current_page(), Some(3));
        page.goto(0, 25);
        assert_eq!(page.current_page(), Some(1));
        page.goto(usize::MAX, 0);
        assert_eq!(page.current_page(), Some(1));
    }

    #[test]
    fn test_show_all_and_back() {
        let mut page = PageState::new(10);
        page.goto(2, 30);
        page.show_all();
        assert!(page.is_show_all());
        page.forward();
        assert!(page.is_show_all());
        page.show_pages();
        assert_eq!(page.current_page(), Some(1));
    }

    #[test]
    fn test_page_links_small() {
        assert_eq!(page_links(1, 1), vec![1]);
        assert_eq!(page_links(4, 11), (1..=11).collect::<Vec<_>>());
    }

    #[test]
    fn test_page_links_window_near_start() {
        let links = page_links(2, 100);
        assert_eq!(links.first(), Some(&1));
        assert_eq!(links.last(), Some(&100));
        for page in 1..=10 {
            assert!(links.contains(&page), "missing {page} in {links:?}");
        }
    }

    #[test]
    fn test_page_links_window_near_end() {
        let links = page_links(99, 100);
        for page in 90..=100 {
            assert!(links.contains(&page), "missing {page} in {links:?}");
        }
    }

    #[test]
    fn test_page_links_are_sparse_for_large_counts() {
        let links = page_links(40, 1000);
        assert!(links.len() < 60, "{links:?}");
        assert!(links.windows(2).all(|w| w[0] < w[1]));
        for page in [1, 35, 40, 45, 1000] {
            assert!(links.contains(&page), "missing {page} in {links:?}");
        }
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits(1), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(1000), 4);
    }
}
