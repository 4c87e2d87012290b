use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::pagination::clamp_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    /// Page number, values below 1 read as 1.
    pub page: Option<i64>,
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn page(&self) -> u64 {
        clamp_page(self.page.unwrap_or(1))
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Wire form of the transaction filters, shared by the read endpoint and
/// the client-side cache keys.
///
/// Field order is the canonical serialisation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilterParams {
    /// Comma-separated customer ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Comma-separated product ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// today, yesterday, thisWeek, thisMonth, thisYear or custom.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}
