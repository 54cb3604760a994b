// ── Pagination state ──

/// Current page window of a table view.
///
/// `page` is zero-based internally; the backend is 1-based, so requests
/// go out with [`wire_page`](Self::wire_page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u32 = 25;

    pub fn new(per_page: u32) -> Self {
        Self {
            page: 0,
            per_page: per_page.max(1),
        }
    }

    /// The 1-based page index sent to the backend.
    pub fn wire_page(self) -> u32 {
        self.page + 1
    }

    /// Back to the first page (any filter/sort mutation does this).
    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// Number of pages needed for `total` rows (at least 1).
    pub fn page_count(self, total: u64) -> u32 {
        let per = u64::from(self.per_page);
        let pages = total.div_ceil(per).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Pagination label like `"1–8 of 8"`, `"26–50 of 312"`, `"0 of 0"`.
    pub fn range_label(self, total: u64) -> String {
        if total == 0 {
            return "0 of 0".into();
        }
        let start = u64::from(self.page) * u64::from(self.per_page) + 1;
        let end = (start + u64::from(self.per_page) - 1).min(total);
        if start > total {
            // Page beyond the end (rows shrank under us).
            return format!("{total} of {total}");
        }
        format!("{start}\u{2013}{end} of {total}")
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_page_is_one_based() {
        let p = PageRequest::new(10);
        assert_eq!(p.wire_page(), 1);

        let p = PageRequest { page: 3, per_page: 10 };
        assert_eq!(p.wire_page(), 4);
    }

    #[test]
    fn range_label_formats() {
        let p = PageRequest::new(10);
        assert_eq!(p.range_label(8), "1\u{2013}8 of 8");
        assert_eq!(p.range_label(0), "0 of 0");

        let p = PageRequest { page: 1, per_page: 25 };
        assert_eq!(p.range_label(312), "26\u{2013}50 of 312");
    }

    #[test]
    fn per_page_is_clamped_positive() {
        assert_eq!(PageRequest::new(0).per_page, 1);
    }
}
