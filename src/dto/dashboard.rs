use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::aggregate::Totals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityCounts {
    pub products: u64,
    pub customers: u64,
    pub transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub counts: EntityCounts,
    /// Totals over every transaction, unfiltered.
    pub stats: Totals,
}
