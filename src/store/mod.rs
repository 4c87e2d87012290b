//! The "list with filters" interface over the relational data source.

use async_trait::async_trait;

use crate::{
    dto::{
        customers::{CreateCustomerRequest, UpdateCustomerRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        transactions::{NewTransaction, UpdateTransactionRequest},
    },
    error::{AppError, AppResult},
    filter::TransactionQuery,
    models::{
        Customer, Product, Transaction, TransactionStatus, TransactionWithRelations, UserProfile,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::SeaOrmStore;

/// One page of products plus the number of rows matching the search.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: u64,
}

/// Storage operations the services need.
///
/// `update_*` and `delete_*` return `false` when no row had the given id.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn list_customers(&self) -> AppResult<Vec<Customer>>;
    async fn get_customer(&self, id: &str) -> AppResult<Option<Customer>>;
    async fn insert_customer(&self, payload: CreateCustomerRequest) -> AppResult<Customer>;
    async fn update_customer(&self, id: &str, payload: UpdateCustomerRequest) -> AppResult<bool>;
    async fn delete_customer(&self, id: &str) -> AppResult<bool>;
    async fn count_customers(&self) -> AppResult<u64>;

    /// Products ordered newest first, optionally narrowed by a name/description search.
    async fn list_products(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> AppResult<ProductPage>;
    async fn get_product(&self, id: i64) -> AppResult<Option<Product>>;
    async fn insert_product(&self, payload: CreateProductRequest) -> AppResult<Product>;
    async fn update_product(&self, id: i64, payload: UpdateProductRequest) -> AppResult<bool>;
    async fn delete_product(&self, id: i64) -> AppResult<bool>;
    async fn count_products(&self) -> AppResult<u64>;

    /// Every transaction matching `query`, in its sort order, joined with display fields.
    async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> AppResult<Vec<TransactionWithRelations>>;
    async fn get_transaction(&self, id: i64) -> AppResult<Option<TransactionWithRelations>>;
    async fn insert_transaction(&self, new: NewTransaction) -> AppResult<Transaction>;
    async fn update_transaction(
        &self,
        id: i64,
        payload: UpdateTransactionRequest,
    ) -> AppResult<bool>;
    async fn delete_transaction(&self, id: i64) -> AppResult<bool>;
    /// Sets `status` on every id, or on none of them if any id is unknown.
    async fn set_transaction_status(
        &self,
        ids: &[i64],
        status: TransactionStatus,
    ) -> AppResult<u64>;
    async fn count_transactions(&self) -> AppResult<u64>;

    async fn upsert_profile(&self, profile: UserProfile) -> AppResult<()>;
}

/// The single error reported when a bulk update names unknown transactions.
pub(crate) fn unknown_ids_error(missing: &[i64]) -> AppError {
    let ids = missing
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    AppError::BadRequest(format!("unknown transaction ids: {ids}"))
}
