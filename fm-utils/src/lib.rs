//! Shared utility functions for flood monitor crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

    /// 24-hour clock label used on the chart axis and table rows: "HH:MM"
    pub const TIME_LABEL_FORMAT: &str = "%H:%M";

    /// Caption date shown above the chart: "Wed, 01 May 2024"
    pub const CAPTION_FORMAT: &str = "%a, %d %b %Y";

    /// Format an instant as "HH:MM" in the given display offset.
    pub fn time_label(instant: &DateTime<Utc>, offset: &FixedOffset) -> String {
        instant
            .with_timezone(offset)
            .format(TIME_LABEL_FORMAT)
            .to_string()
    }

    /// Format the calendar date of an instant in the given display offset.
    pub fn caption_date(instant: &DateTime<Utc>, offset: &FixedOffset) -> String {
        instant
            .with_timezone(offset)
            .format(CAPTION_FORMAT)
            .to_string()
    }

    /// Parse an ISO 8601 timestamp.
    ///
    /// RFC 3339 strings keep their offset. A timestamp without an offset
    /// ("2024-05-01T12:00:00") is taken to be UTC.
    pub fn parse_instant(s: &str) -> anyhow::Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")?;
        Ok(naive.and_utc())
    }

}

/// 1-based page windowing shared by the station list and the readings table.
pub mod paging {
    /// Number of pages needed for `total_items`. Never less than 1, so an
    /// empty set still reports page 1 of 1.
    pub fn page_count(total_items: usize, page_size: usize) -> usize {
        if page_size == 0 {
            return 1;
        }
        total_items.div_ceil(page_size).max(1)
    }

    /// Clamp a 1-based page index into `[1, page_count]`.
    pub fn clamp_page(page: usize, total_items: usize, page_size: usize) -> usize {
        page.clamp(1, page_count(total_items, page_size))
    }

    /// One window over a slice.
    #[derive(Debug, PartialEq)]
    pub struct Page<'a, T> {
        pub items: &'a [T],
        /// 1-based, already clamped
        pub page: usize,
        pub total_pages: usize,
        pub total_items: usize,
    }

    impl<T> Page<'_, T> {
        pub fn has_previous(&self) -> bool {
            self.page > 1
        }

        pub fn has_next(&self) -> bool {
            self.page < self.total_pages
        }
    }

    /// Slice out page `page` (clamped) of `items`.
    pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
        let total_items = items.len();
        let total_pages = page_count(total_items, page_size);
        let page = page.clamp(1, total_pages);
        let start = ((page - 1) * page_size).min(total_items);
        let end = (start + page_size).min(total_items);
        Page {
            items: &items[start..end],
            page,
            total_pages,
            total_items,
        }
    }

}
