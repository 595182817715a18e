//! Page-window arithmetic and the pagination control model shared by the
//! GUI and the CLI.

use std::ops::Range;

use crate::{
    domain::{PageInfo, PageRef},
    error::PageError,
};

pub const CHARACTERS_PER_PAGE: usize = 20;

/// Number of pages needed to show `count` items, `ceil(count / page_size)`.
pub fn total_pages(count: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size) as u32
}

/// Index range of 1-based `page` over `len` items. Pages past the end yield
/// an empty range.
pub fn page_window(len: usize, page: u32, page_size: usize) -> Range<usize> {
    let page = page.max(1) as usize;
    let start = (page - 1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

pub fn slice_page<T: Clone>(items: &[T], page: u32, page_size: usize) -> Vec<T> {
    items[page_window(items.len(), page, page_size)].to_vec()
}

pub fn validate_page(requested: u32, total_pages: u32) -> Result<u32, PageError> {
    if requested == 0 || requested > total_pages {
        return Err(PageError::OutOfRange {
            requested,
            total_pages,
        });
    }
    Ok(requested)
}

/// Pagination metadata for a client-side sliced result set.
pub fn local_page_info(count: usize, page: u32, page_size: usize) -> PageInfo {
    let pages = total_pages(count, page_size);
    PageInfo {
        next: (page < pages).then(|| PageRef::Number(page + 1)),
        prev: (page > 1).then(|| PageRef::Number(page - 1)),
        total_pages: pages,
        total_count: count as u32,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u32, active: bool },
    Ellipsis,
}

/// Page buttons to render between Previous and Next.
///
/// Up to three pages are all listed. Beyond that the first and last page are
/// always shown, the current page and its successor are shown when the
/// current page is interior, and an ellipsis marks every gap.
pub fn pagination_items(current: u32, total: u32) -> Vec<PageItem> {
    let page = |number: u32| PageItem::Page {
        number,
        active: number == current,
    };

    if total <= 3 {
        return (1..=total).map(page).collect();
    }

    let mut items = vec![page(1)];
    if current > 2 {
        items.push(PageItem::Ellipsis);
    }
    if current > 1 && current < total {
        items.push(page(current));
        if current + 1 < total {
            items.push(page(current + 1));
        }
    }
    if current + 1 < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(page(total));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(items: &[PageItem]) -> Vec<Option<u32>> {
        items
            .iter()
            .map(|item| match item {
                PageItem::Page { number, .. } => Some(*number),
                PageItem::Ellipsis => None,
            })
            .collect()
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, CHARACTERS_PER_PAGE), 0);
        assert_eq!(total_pages(1, CHARACTERS_PER_PAGE), 1);
        assert_eq!(total_pages(20, CHARACTERS_PER_PAGE), 1);
        assert_eq!(total_pages(21, CHARACTERS_PER_PAGE), 2);
        assert_eq!(total_pages(60, CHARACTERS_PER_PAGE), 3);
    }

    #[test]
    fn page_windows_never_exceed_page_size() {
        for count in [0usize, 1, 19, 20, 21, 39, 40, 41, 99] {
            let pages = total_pages(count, CHARACTERS_PER_PAGE);
            let mut covered = 0;
            for page in 1..=pages {
                let window = page_window(count, page, CHARACTERS_PER_PAGE);
                assert!(window.len() <= CHARACTERS_PER_PAGE);
                if page < pages {
                    assert_eq!(window.len(), CHARACTERS_PER_PAGE);
                }
                covered += window.len();
            }
            assert_eq!(covered, count, "count {count}");
        }
    }

    #[test]
    fn window_past_the_end_is_empty() {
        assert!(page_window(25, 3, CHARACTERS_PER_PAGE).is_empty());
        assert_eq!(slice_page(&[1, 2, 3], 1, 2), vec![1, 2]);
        assert_eq!(slice_page(&[1, 2, 3], 2, 2), vec![3]);
    }

    #[test]
    fn validate_page_rejects_zero_and_overflow() {
        assert_eq!(validate_page(1, 3), Ok(1));
        assert!(validate_page(0, 3).is_err());
        assert_eq!(
            validate_page(4, 3),
            Err(PageError::OutOfRange {
                requested: 4,
                total_pages: 3
            })
        );
    }

    #[test]
    fn local_page_info_disables_edges() {
        let first = local_page_info(45, 1, CHARACTERS_PER_PAGE);
        assert_eq!(first.total_pages, 3);
        assert!(first.prev.is_none());
        assert_eq!(first.next, Some(PageRef::Number(2)));

        let last = local_page_info(45, 3, CHARACTERS_PER_PAGE);
        assert_eq!(last.prev, Some(PageRef::Number(2)));
        assert!(last.next.is_none());
    }

    #[test]
    fn small_totals_list_every_page() {
        let items = pagination_items(2, 2);
        assert_eq!(numbers(&items), vec![Some(1), Some(2)]);
        assert!(items.contains(&PageItem::Page {
            number: 2,
            active: true
        }));
        assert!(pagination_items(1, 0).is_empty());
    }

    #[test]
    fn interior_page_shows_neighbour_and_both_ellipses() {
        let items = pagination_items(5, 10);
        assert_eq!(
            numbers(&items),
            vec![Some(1), None, Some(5), Some(6), None, Some(10)]
        );
        assert!(items.contains(&PageItem::Page {
            number: 5,
            active: true
        }));
    }

    #[test]
    fn edge_pages_collapse_the_middle() {
        assert_eq!(numbers(&pagination_items(1, 10)), vec![Some(1), None, Some(10)]);
        assert_eq!(
            numbers(&pagination_items(10, 10)),
            vec![Some(1), None, Some(10)]
        );
        assert_eq!(
            numbers(&pagination_items(9, 10)),
            vec![Some(1), None, Some(9), Some(10)]
        );
        assert_eq!(
            numbers(&pagination_items(2, 4)),
            vec![Some(1), Some(2), Some(3), Some(4)]
        );
    }
}
