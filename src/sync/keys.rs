use crate::filter::FilterState;

pub const TRANSACTIONS_KEY_PREFIX: &str = "/api/transactions";
pub const DASHBOARD_STATS_KEY: &str = "/api/dashboard/stats";

/// Cache key for a transaction listing: endpoint plus canonical query string.
pub fn transactions_key(filters: &FilterState) -> String {
    let query = filters.query_string();
    if query.is_empty() {
        TRANSACTIONS_KEY_PREFIX.to_string()
    } else {
        format!("{TRANSACTIONS_KEY_PREFIX}?{query}")
    }
}
