//! Caller-side pagination.

use serde::Serialize;

/// One page of an already-filtered result.
///
/// Pages are 1-based. A page past the end is empty rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
}

impl<T> Page<T> {
    /// Slice `items` into page `page` of size `per_page`.
    ///
    /// `page` 0 is treated as 1 and `per_page` 0 as 1.
    pub fn paginate(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = items.len();
        let start = (page - 1).saturating_mul(per_page).min(total);

        let items = items.into_iter().skip(start).take(per_page).collect();
        Self {
            items,
            page,
            per_page,
            total,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_middle_page() {
        let page = Page::paginate((1..=25).collect::<Vec<_>>(), 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_past_end_is_empty() {
        let page = Page::paginate(vec![1, 2, 3], 5, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_next());
    }

    #[test]
    fn test_zero_inputs_are_clamped() {
        let page = Page::paginate(vec!['a', 'b'], 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec!['a']);
    }

    proptest! {
        #[test]
        fn pages_cover_every_item_once(len in 0usize..200, per_page in 1usize..30) {
            let items: Vec<usize> = (0..len).collect();
            let pages = Page::paginate(items.clone(), 1, per_page).total_pages().max(1);
            let mut seen = Vec::new();
            for p in 1..=pages {
                seen.extend(Page::paginate(items.clone(), p, per_page).items);
            }
            prop_assert_eq!(seen, items);
        }
    }
}
