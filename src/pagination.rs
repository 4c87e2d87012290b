//! Fixed-size paging over an already filtered and sorted result set.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page, after clamping.
    pub page: u64,
    pub per_page: u64,
    pub offset: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PageWindow {
    /// Builds the window for `requested` over `total_items` rows. Pages below 1 read as page 1.
    pub fn new(requested: i64, total_items: u64) -> Self {
        let page = clamp_page(requested);
        Self {
            page,
            per_page: PAGE_SIZE,
            offset: offset_for(page),
            total_items,
            total_pages: total_items.div_ceil(PAGE_SIZE),
        }
    }

    /// Takes this window's rows out of the full set. A page past the end is empty.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        items
            .into_iter()
            .skip(offset)
            .take(self.per_page as usize)
            .collect()
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            current_page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

pub fn clamp_page(requested: i64) -> u64 {
    u64::try_from(requested.max(1)).unwrap_or(1)
}

pub fn offset_for(page: u64) -> u64 {
    page.saturating_sub(1) * PAGE_SIZE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}
