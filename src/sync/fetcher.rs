use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::AppResult,
    response::ApiResponse,
    routes::params::{ProductQuery, TransactionFilterParams},
    services::{customer_service, dashboard_service, product_service, transaction_service},
    state::AppState,
    sync::keys::{DASHBOARD_STATS_KEY, TRANSACTIONS_KEY_PREFIX},
};

/// Loads the current value behind a cache key.
///
/// Errors are reduced to the message the UI shows next to stale data.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Value, String>;
}

/// Resolves keys by calling the service layer directly, without HTTP.
#[derive(Clone)]
pub struct InProcessFetcher {
    state: AppState,
}

impl InProcessFetcher {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn dispatch(&self, path: &str, query: &str) -> Result<Value, String> {
        match path {
            TRANSACTIONS_KEY_PREFIX => {
                let params: TransactionFilterParams =
                    serde_urlencoded::from_str(query).map_err(|e| e.to_string())?;
                data_of(transaction_service::list_transactions(&self.state, params).await)
            }
            DASHBOARD_STATS_KEY => data_of(dashboard_service::stats(&self.state).await),
            "/api/customers" => data_of(customer_service::list_customers(&self.state).await),
            "/api/products" => {
                let query: ProductQuery =
                    serde_urlencoded::from_str(query).map_err(|e| e.to_string())?;
                data_of(product_service::list_products(&self.state, query).await)
            }
            other => Err(format!("no cached endpoint at `{other}`")),
        }
    }
}

#[async_trait]
impl Fetcher for InProcessFetcher {
    async fn fetch(&self, key: &str) -> Result<Value, String> {
        let (path, query) = key.split_once('?').unwrap_or((key, ""));
        self.dispatch(path, query).await
    }
}

fn data_of<T: Serialize>(result: AppResult<ApiResponse<T>>) -> Result<Value, String> {
    let response = result.map_err(|e| e.to_string())?;
    serde_json::to_value(response.data).map_err(|e| e.to_string())
}
