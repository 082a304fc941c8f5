// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_ITEMS_PER_PAGE: i64 = 10;

fn default_page() -> i64 {
    1
}

fn default_items_per_page() -> i64 {
    DEFAULT_ITEMS_PER_PAGE
}

/// Janela de paginação por offset. A página começa em 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, items_per_page: i64) -> Self {
        Self { page, items_per_page }.normalized()
    }

    /// Página < 1 vira 1; tamanho < 1 volta ao padrão.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            items_per_page: if self.items_per_page < 1 {
                DEFAULT_ITEMS_PER_PAGE
            } else {
                self.items_per_page
            },
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.items_per_page
    }

    pub fn limit(&self) -> i64 {
        self.items_per_page
    }

    /// Intervalo inclusivo `[from, to]`, como o `range` do backend.
    pub fn range(&self) -> (i64, i64) {
        let from = self.offset();
        (from, from + self.items_per_page - 1)
    }
}

pub fn total_pages(total: i64, items_per_page: i64) -> i64 {
    if total <= 0 || items_per_page <= 0 {
        return 0;
    }
    (total + items_per_page - 1) / items_per_page
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub items_per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            page: request.page,
            items_per_page: request.items_per_page,
            total,
            total_pages: total_pages(total, request.items_per_page),
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Recorta uma lista já filtrada e ordenada.
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as i64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Self::new(items, request, total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            items_per_page: self.items_per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling_of_total_over_size() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let all: Vec<i64> = (0..23).collect();
        let last = Page::slice(all.clone(), PageRequest::new(3, 10));
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.items, vec![20, 21, 22]);

        let exact: Vec<i64> = (0..20).collect();
        let last = Page::slice(exact, PageRequest::new(2, 10));
        assert_eq!(last.items.len(), 10);
    }

    #[test]
    fn range_is_inclusive_and_page_is_clamped() {
        assert_eq!(PageRequest::new(1, 10).range(), (0, 9));
        assert_eq!(PageRequest::new(3, 10).range(), (20, 29));
        assert_eq!(PageRequest::new(0, 0), PageRequest::default());
    }
}
