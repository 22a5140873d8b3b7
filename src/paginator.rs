//! # Paginator Module
//!
//! Splits a chat's items into pages that fit a Telegram poll. A poll carries
//! between 2 and 10 options, so pages never exceed [`PAGE_SIZE`] and, once
//! there is more than one page, the last page never holds a single item.

/// Maximum number of options in one poll
pub const PAGE_SIZE: usize = 10;

/// Minimum number of options Telegram accepts in a poll
pub const MIN_POLL_OPTIONS: usize = 2;

/// A bounded group of items rendered as one poll
pub type Page = Vec<String>;

/// Partition `items` into consecutive pages of at most `page_size` items.
///
/// When the final page would hold a single item and other pages exist, the
/// last item of the second-to-last page is moved to the end of the final
/// page. An empty input yields no pages.
///
/// # Examples
///
/// ```rust
/// use shopping_list::paginator::{paginate, PAGE_SIZE};
///
/// let items: Vec<String> = (1..=11).map(|i| i.to_string()).collect();
/// let pages = paginate(&items, PAGE_SIZE);
/// assert_eq!(pages[0].len(), 9);
/// assert_eq!(pages[1], vec!["11".to_string(), "10".to_string()]);
/// ```
pub fn paginate(items: &[String], page_size: usize) -> Vec<Page> {
    // the rebalanced second-to-last page must keep at least two options
    let page_size = page_size.max(MIN_POLL_OPTIONS + 1);
    let mut pages: Vec<Page> = items.chunks(page_size).map(<[String]>::to_vec).collect();

    let count = pages.len();
    if count > 1 && pages[count - 1].len() == 1 {
        if let Some(moved) = pages[count - 2].pop() {
            pages[count - 1].push(moved);
        }
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (1..=n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_empty_yields_no_pages() {
        assert!(paginate(&[], PAGE_SIZE).is_empty());
    }

    #[test]
    fn test_single_item_single_page() {
        let pages = paginate(&numbered(1), PAGE_SIZE);
        assert_eq!(pages, vec![vec!["1".to_string()]]);
    }

    #[test]
    fn test_exactly_one_full_page() {
        let items = numbered(10);
        let pages = paginate(&items, PAGE_SIZE);
        assert_eq!(pages, vec![items]);
    }

    #[test]
    fn test_eleven_items_rebalanced() {
        let pages = paginate(&numbered(11), PAGE_SIZE);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], numbered(9));
        assert_eq!(pages[1], vec!["11".to_string(), "10".to_string()]);
    }

    #[test]
    fn test_twenty_one_items() {
        let pages = paginate(&numbered(21), PAGE_SIZE);
        let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 9, 2]);
    }

    #[test]
    fn test_twelve_items_untouched() {
        let pages = paginate(&numbered(12), PAGE_SIZE);
        assert_eq!(pages[0], numbered(10));
        assert_eq!(pages[1], vec!["11".to_string(), "12".to_string()]);
    }

    #[test]
    fn test_pages_fit_poll_limits() {
        for n in 2..=57 {
            let items = numbered(n);
            let pages = paginate(&items, PAGE_SIZE);

            for page in &pages {
                assert!(page.len() >= MIN_POLL_OPTIONS, "n={n}: page {page:?}");
                assert!(page.len() <= PAGE_SIZE, "n={n}: page {page:?}");
            }

            let mut flattened: Vec<String> = pages.concat();
            assert_eq!(flattened.len(), n);
            flattened.sort_by_key(|s| s.parse::<usize>().unwrap_or(0));
            assert_eq!(flattened, items);
        }
    }
}
