use crate::page::{cursor::Cursor, request::PageRequest};
use serde::{Deserialize, Serialize};

///
/// TotalElements
///
/// `Unknown` when counting was skipped or the page degraded.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TotalElements {
    Known(u64),
    Unknown,
}

impl TotalElements {
    #[must_use]
    pub const fn known(self) -> Option<u64> {
        match self {
            Self::Known(total) => Some(total),
            Self::Unknown => None,
        }
    }
}

///
/// Page
///
/// One page of results plus its metadata. `next_cursor` is the sort key of
/// the last row and can be handed to a continuation seek.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    content: Vec<T>,
    page: u64,
    size: u64,
    total_elements: TotalElements,
    total_pages: Option<u64>,
    has_next: bool,
    has_previous: bool,
    is_first: bool,
    is_last: bool,
    next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    pub(crate) fn assemble(
        content: Vec<T>,
        request: PageRequest,
        has_next: bool,
        total_elements: TotalElements,
        next_cursor: Option<Cursor>,
    ) -> Self {
        let total_pages = total_elements
            .known()
            .map(|total| total.div_ceil(request.size));
        let is_last = total_pages.map_or(!has_next, |pages| request.page.saturating_add(1) >= pages);

        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
            has_next,
            has_previous: request.page > 0,
            is_first: request.page == 0,
            is_last,
            next_cursor,
        }
    }

    pub(crate) fn empty(request: PageRequest, total_elements: TotalElements) -> Self {
        Self::assemble(Vec::new(), request, false, total_elements, None)
    }

    #[must_use]
    pub fn content(&self) -> &[T] {
        &self.content
    }

    #[must_use]
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub const fn total_elements(&self) -> TotalElements {
        self.total_elements
    }

    #[must_use]
    pub const fn total_pages(&self) -> Option<u64> {
        self.total_pages
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.has_previous
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.is_first
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.is_last
    }

    #[must_use]
    pub const fn next_cursor(&self) -> Option<&Cursor> {
        self.next_cursor.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Map the content, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
            is_first: self.is_first,
            is_last: self.is_last,
            next_cursor: self.next_cursor,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: u64, size: u64) -> PageRequest {
        PageRequest { page, size }
    }

    #[test]
    fn known_total_drives_page_count() {
        let page = Page::assemble(vec![1, 2], request(2, 2), true, TotalElements::Known(7), None);

        assert_eq!(page.total_pages(), Some(4));
        assert!(page.has_previous());
        assert!(!page.is_first());
        assert!(!page.is_last());
    }

    #[test]
    fn last_page_by_count() {
        let page = Page::assemble(vec![7], request(3, 2), false, TotalElements::Known(7), None);

        assert!(page.is_last());
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn unknown_total_uses_has_next() {
        let page: Page<u8> = Page::empty(request(5, 10), TotalElements::Unknown);

        assert_eq!(page.total_pages(), None);
        assert!(page.is_last());
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn zero_total_is_a_single_last_page() {
        let page: Page<u8> = Page::empty(request(0, 10), TotalElements::Known(0));

        assert_eq!(page.total_pages(), Some(0));
        assert!(page.is_first());
        assert!(page.is_last());
    }

    #[test]
    fn map_keeps_metadata() {
        let page = Page::assemble(vec![1, 2], request(0, 2), true, TotalElements::Unknown, None);
        let mapped = page.map(|n| n * 10);

        assert_eq!(mapped.content(), &[10, 20]);
        assert!(mapped.has_next());
        assert!(!mapped.is_last());
    }
}
