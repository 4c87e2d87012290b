mod common;

use common::{add_product, add_transaction, day, memory_state};
use sales_ledger_api::{
    dto::customers::CreateCustomerRequest,
    error::AppError,
    filter::FilterState,
    routes::params::TransactionFilterParams,
    services::{customer_service, transaction_service},
    store::DataSource,
};

fn customer(id: &str) -> CreateCustomerRequest {
    CreateCustomerRequest {
        id: Some(id.to_string()),
        name: "Warung".into(),
        description: None,
        phone: None,
        address: None,
    }
}

#[tokio::test]
async fn ids_the_filter_cannot_encode_are_rejected() -> anyhow::Result<()> {
    let (state, store) = memory_state();

    for id in ["C1,C2", "all", "ALL", " C1", "C1 ", ""] {
        let err = customer_service::create_customer(&state, customer(id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "{id:?}");
    }
    assert_eq!(store.count_customers().await?, 0);
    Ok(())
}

#[tokio::test]
async fn generated_and_plain_ids_are_accepted() -> anyhow::Result<()> {
    let (state, store) = memory_state();

    customer_service::create_customer(&state, customer("C-1")).await?;
    customer_service::create_customer(
        &state,
        CreateCustomerRequest {
            id: None,
            ..customer("unused")
        },
    )
    .await?;

    let customers = store.list_customers().await?;
    assert_eq!(customers.len(), 2);
    assert!(customers.iter().all(|c| !c.id.contains(',')));
    Ok(())
}

#[tokio::test]
async fn created_customer_is_selectable_through_the_encoded_filter() -> anyhow::Result<()> {
    let (state, store) = memory_state();
    customer_service::create_customer(&state, customer("warung.sri-01")).await?;
    customer_service::create_customer(&state, customer("other")).await?;
    let bread = add_product(&store, "Bread", Some(1000)).await?;
    add_transaction(&store, day(2024, 6, 1), "warung.sri-01", bread, Some(2), None).await?;
    add_transaction(&store, day(2024, 6, 1), "other", bread, Some(7), None).await?;

    let mut filters = FilterState::new();
    filters.set_customers(["warung.sri-01"]);
    let params: TransactionFilterParams = serde_urlencoded::from_str(&filters.query_string())?;

    let page = transaction_service::list_transactions(&state, params)
        .await?
        .data
        .expect("page data");
    assert_eq!(page.transactions.len(), 1);
    assert_eq!(page.transactions[0].transaction.customer_id, "warung.sri-01");
    assert_eq!(page.stats.total_order, 2);
    Ok(())
}
