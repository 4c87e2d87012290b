#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use sales_ledger_api::{
    dto::{
        customers::CreateCustomerRequest, products::CreateProductRequest,
        transactions::NewTransaction,
    },
    middleware::auth::AuthUser,
    models::TransactionStatus,
    state::{AppState, Clock},
    store::{DataSource, MemoryStore},
};
use uuid::Uuid;

/// Saturday 15 June 2024; the week containing it starts on Sunday the 9th.
pub fn reference_day() -> NaiveDate {
    day(2024, 6, 15)
}

pub fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).expect("valid date")
}

pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone()).with_clock(Clock::Fixed(reference_day()));
    (state, store)
}

pub fn seller() -> AuthUser {
    AuthUser {
        user_id: Uuid::from_u128(0x5e11e5),
        email: Some("seller@example.com".into()),
        full_name: Some("Seller".into()),
    }
}

pub async fn add_customer(store: &MemoryStore, id: &str) -> anyhow::Result<()> {
    store
        .insert_customer(CreateCustomerRequest {
            id: Some(id.to_string()),
            name: format!("Customer {id}"),
            description: None,
            phone: None,
            address: None,
        })
        .await?;
    Ok(())
}

pub async fn add_product(store: &MemoryStore, name: &str, price: Option<i64>) -> anyhow::Result<i64> {
    let product = store
        .insert_product(CreateProductRequest {
            name: name.to_string(),
            description: None,
            price,
            customer_price: None,
        })
        .await?;
    Ok(product.id)
}

pub async fn add_transaction(
    store: &MemoryStore,
    date: NaiveDate,
    customer_id: &str,
    product_id: i64,
    order_qty: Option<i32>,
    return_qty: Option<i32>,
) -> anyhow::Result<i64> {
    let transaction = store
        .insert_transaction(NewTransaction {
            date,
            customer_id: customer_id.to_string(),
            product_id,
            order_qty,
            return_qty,
            status: TransactionStatus::Pending,
            notes: None,
            created_by: seller().user_id,
        })
        .await?;
    Ok(transaction.id)
}
