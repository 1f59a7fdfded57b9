//! Page-number pagination with lenient page resolution.

use serde::Serialize;

/// A requested page number as it arrived, before it is checked against the
/// collection size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    raw: Option<String>,
}

impl PageRequest {
    /// Build from the raw `page` query value, if any.
    pub fn from_query(raw: Option<&str>) -> Self {
        Self {
            raw: raw.map(|s| s.trim().to_string()),
        }
    }

    pub fn number(page: u64) -> Self {
        Self {
            raw: Some(page.to_string()),
        }
    }

    pub fn first() -> Self {
        Self::default()
    }

    /// Resolve to a 1-based page number within `1..=total_pages`.
    ///
    /// Junk or missing values give page 1. Numbers outside the range give
    /// the last page.
    pub fn resolve(&self, total_pages: u64) -> u64 {
        let last = total_pages.max(1);
        let Some(raw) = self.raw.as_deref() else {
            return 1;
        };
        match raw.parse::<i64>() {
            Ok(n) if n < 1 => last,
            Ok(n) => (n as u64).min(last),
            // Too large for i64 but still a number.
            Err(_) if is_integer(raw) => last,
            Err(_) => 1,
        }
    }
}

fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Number of pages needed for `total_items` at `per_page`. Never zero.
pub fn page_count(total_items: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 1;
    }
    total_items.div_ceil(per_page).max(1)
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cut one page out of an already ordered collection.
    pub fn slice(all: Vec<T>, request: &PageRequest, per_page: u64) -> Self {
        let total_items = all.len() as u64;
        let total_pages = page_count(total_items, per_page);
        let number = request.resolve(total_pages);
        let offset = ((number - 1) * per_page) as usize;
        let items = all
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();

        Self {
            items,
            number,
            per_page,
            total_items,
            total_pages,
        }
    }

    /// Replace the items, keeping the page metadata.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            number: self.number,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        })
    }
}
