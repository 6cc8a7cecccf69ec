use serde::Serialize;

use crate::database::db::queries::{ListOrder, Window};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// `page` is 1-based; `pages` is the total page count for the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

/// One page of a listing plus the total number of matches.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pagination: Pagination,
}

impl<T> Paged<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pagination: self.pagination,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Unparseable values fall back to the defaults; `limit` is clamped to `1..=MAX_LIMIT`.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|l| *l >= 1)
            .map(|l| l.min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    pub fn window(&self) -> Window {
        Window {
            limit: i64::from(self.limit),
            offset: (i64::from(self.page) - 1) * i64::from(self.limit),
        }
    }

    pub fn paginate<T>(&self, items: Vec<T>, total: u64) -> Paged<T> {
        Paged {
            items,
            total,
            pagination: Pagination {
                page: self.page,
                limit: self.limit,
                pages: page_count(total, self.limit),
            },
        }
    }
}

pub fn page_count(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX)
}

/// `field` ascending or `-field` descending, looked up in `allowed`
/// (`(query name, SQL expression)`); anything else yields `default`.
pub fn parse_sort(raw: Option<&str>, allowed: &[(&str, &'static str)], default: ListOrder) -> ListOrder {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return default;
    };
    let (name, descending) = match raw.strip_prefix('-') {
        Some(name) => (name, true),
        None => (raw.strip_prefix('+').unwrap_or(raw), false),
    };

    allowed
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, column)| ListOrder { column, descending })
        .unwrap_or(default)
}
