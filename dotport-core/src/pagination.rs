//! Client-side page state over an in-memory snapshot.

/// Default rows per page across every dataset.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// One entry in a rendered pagination strip: a page number or an elided run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// Current page and page size; derives the slice window.
///
/// Deliberately unclamped: selecting a page past the end is a valid state
/// that yields an empty slice, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: usize,
    page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    /// Start on page one with the given page size (floored to 1).
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based index of the first row on the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Changing the page size always returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Back to page one, keeping the page size.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// The current page's window over `items`; empty when out of range.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = (self.offset() + self.page_size).min(items.len());
        &items[start..end]
    }

    /// One-based inclusive range for "Showing X to Y of Z records".
    pub fn display_range(&self, total_items: usize) -> (usize, usize) {
        let start = (self.offset() + 1).min(total_items);
        let end = (self.offset() + self.page_size).min(total_items);
        (start, end)
    }
}

/// Page-number strip with at most seven visible slots. Longer runs keep the
/// first and last page plus a window around the current page, eliding the
/// rest as [`PageLink::Gap`].
pub fn page_links(current: usize, total: usize) -> Vec<PageLink> {
    const MAX_VISIBLE: usize = 7;

    if total <= MAX_VISIBLE {
        return (1..=total).map(PageLink::Page).collect();
    }

    let mut links = vec![PageLink::Page(1)];
    if current > 3 {
        links.push(PageLink::Gap);
    }

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);
    for page in start..=end {
        links.push(PageLink::Page(page));
    }

    if current + 2 < total {
        links.push(PageLink::Gap);
    }
    links.push(PageLink::Page(total));
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_arithmetic() {
        let mut state = PageState::new(25);
        assert_eq!(state.offset(), 0);

        state.set_page(3);
        assert_eq!(state.offset(), 50);

        state.set_page_size(10);
        assert_eq!(state.page(), 1, "page size change returns to page one");
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn test_page_floors_at_one() {
        let mut state = PageState::new(25);
        state.set_page(0);
        assert_eq!(state.page(), 1);

        state.prev_page();
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_reset() {
        let mut state = PageState::new(50);
        state.set_page(7);
        state.reset();
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 50);
    }

    #[test]
    fn test_total_pages() {
        let state = PageState::new(25);
        assert_eq!(state.total_pages(0), 0);
        assert_eq!(state.total_pages(25), 1);
        assert_eq!(state.total_pages(26), 2);
        assert_eq!(state.total_pages(63), 3);
    }

    #[test]
    fn test_slice_63_records_at_25_per_page() {
        let items: Vec<usize> = (1..=63).collect();
        let mut state = PageState::new(25);

        let page = state.slice(&items);
        assert_eq!(page.first(), Some(&1));
        assert_eq!(page.last(), Some(&25));

        state.set_page(3);
        let page = state.slice(&items);
        assert_eq!(page.len(), 13);
        assert_eq!(page.first(), Some(&51));
        assert_eq!(page.last(), Some(&63));
    }

    #[test]
    fn test_slice_out_of_range_is_empty() {
        let items: Vec<usize> = (1..=10).collect();
        let mut state = PageState::new(25);
        state.set_page(5);

        assert!(state.slice(&items).is_empty());
    }

    #[test]
    fn test_display_range() {
        let mut state = PageState::new(25);
        assert_eq!(state.display_range(63), (1, 25));

        state.set_page(3);
        assert_eq!(state.display_range(63), (51, 63));

        state.reset();
        assert_eq!(state.display_range(0), (0, 0));
    }

    #[test]
    fn test_page_links_short_run() {
        let links = page_links(2, 5);
        assert_eq!(
            links,
            vec![
                PageLink::Page(1),
                PageLink::Page(2),
                PageLink::Page(3),
                PageLink::Page(4),
                PageLink::Page(5),
            ]
        );
    }

    #[test]
    fn test_page_links_elides_middle() {
        let links = page_links(5, 10);
        assert_eq!(
            links,
            vec![
                PageLink::Page(1),
                PageLink::Gap,
                PageLink::Page(4),
                PageLink::Page(5),
                PageLink::Page(6),
                PageLink::Gap,
                PageLink::Page(10),
            ]
        );
    }

    #[test]
    fn test_page_links_near_edges() {
        let links = page_links(1, 10);
        assert_eq!(
            links,
            vec![
                PageLink::Page(1),
                PageLink::Page(2),
                PageLink::Gap,
                PageLink::Page(10),
            ]
        );

        let links = page_links(9, 10);
        assert_eq!(
            links,
            vec![
                PageLink::Page(1),
                PageLink::Gap,
                PageLink::Page(8),
                PageLink::Page(9),
                PageLink::Page(10),
            ]
        );
    }

    #[test]
    fn test_page_links_empty() {
        assert!(page_links(1, 0).is_empty());
    }
}
