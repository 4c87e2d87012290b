//! Client-side stale-while-revalidate cache for the read endpoints.

pub mod cache;
pub mod fetcher;
pub mod keys;

pub use cache::{CacheEntry, CacheEvent, SyncCache};
pub use fetcher::{Fetcher, InProcessFetcher};
pub use keys::{DASHBOARD_STATS_KEY, TRANSACTIONS_KEY_PREFIX, transactions_key};
