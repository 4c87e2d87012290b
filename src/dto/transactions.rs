use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    aggregate::Totals,
    models::{TransactionStatus, TransactionWithRelations},
    pagination::PageInfo,
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Business date, today when omitted.
    pub date: Option<NaiveDate>,
    pub customer_id: String,
    pub product_id: i64,
    pub order_qty: Option<i32>,
    pub return_qty: Option<i32>,
    pub status: Option<TransactionStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateTransactionRequest {
    pub date: Option<NaiveDate>,
    pub customer_id: Option<String>,
    pub product_id: Option<i64>,
    pub order_qty: Option<i32>,
    pub return_qty: Option<i32>,
    pub status: Option<TransactionStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BulkStatusRequest {
    pub ids: Vec<i64>,
    pub status: TransactionStatus,
}

/// A validated transaction ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub customer_id: String,
    pub product_id: i64,
    pub order_qty: Option<i32>,
    pub return_qty: Option<i32>,
    pub status: TransactionStatus,
    pub notes: Option<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransactionsPage {
    pub transactions: Vec<TransactionWithRelations>,
    pub pagination: PageInfo,
    /// Totals over the whole filtered set, identical on every page.
    pub stats: Totals,
}
