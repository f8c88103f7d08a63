use serde::Deserialize;

/// Paging and search parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub q: Option<String>,
}

/// Default and maximum page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self { default_limit: 12, max_limit: 100 }
    }
}

/// A window over a filtered, sorted collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

impl PageRequest {
    pub fn search(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or("")
    }
}

impl<T> Page<T> {
    /// Slices `items` into the requested page. `page` is 1-based and clamped to at
    /// least 1; `limit` falls back to the default and is clamped to `[1, max_limit]`.
    pub fn paginate(items: Vec<T>, request: &PageRequest, limits: PageLimits) -> Self {
        let page = request.page.unwrap_or(1).max(1);
        let limit = request
            .limit
            .unwrap_or(limits.default_limit)
            .clamp(1, limits.max_limit.max(1));
        let total = items.len();
        let total_pages = total.div_ceil(limit);
        let items = items.into_iter().skip((page - 1).saturating_mul(limit)).take(limit).collect();
        Self { items, page, total_pages, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: Option<usize>, limit: Option<usize>) -> PageRequest {
        PageRequest { page, limit, q: None }
    }

    fn limits(max_limit: usize) -> PageLimits {
        PageLimits { default_limit: 12, max_limit }
    }

    #[test]
    fn test_paginate_defaults() {
        let page = Page::paginate((1..=30).collect::<Vec<_>>(), &request(None, None), limits(100));
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 30);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_paginate_last_page_and_beyond() {
        let items: Vec<u32> = (1..=30).collect();
        let last = Page::paginate(items.clone(), &request(Some(3), None), limits(100));
        assert_eq!(last.items, (25..=30).collect::<Vec<_>>());

        let beyond = Page::paginate(items, &request(Some(9), None), limits(100));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 3);
    }

    #[test]
    fn test_paginate_huge_page_is_empty() {
        let page = Page::paginate(vec![1, 2, 3], &request(Some(usize::MAX), Some(12)), limits(100));
        assert!(page.items.is_empty());
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_paginate_clamps_limit_and_page() {
        let items: Vec<u32> = (1..=5).collect();
        let zero = Page::paginate(items.clone(), &request(Some(0), Some(0)), limits(100));
        assert_eq!(zero.page, 1);
        assert_eq!(zero.items, vec![1]);
        assert_eq!(zero.total_pages, 5);

        let huge = Page::paginate(items, &request(None, Some(1_000)), limits(2));
        assert_eq!(huge.items, vec![1, 2]);
        assert_eq!(huge.total_pages, 3);
    }

    #[test]
    fn test_paginate_empty() {
        let page = Page::paginate(Vec::<u32>::new(), &request(None, None), limits(100));
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_search_trims() {
        let request = PageRequest { q: Some("  mouse ".into()), ..Default::default() };
        assert_eq!(request.search(), "mouse");
        assert_eq!(PageRequest::default().search(), "");
    }
}
