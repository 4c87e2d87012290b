mod common;

use std::sync::Arc;

use common::{day, reference_day, seller};
use sales_ledger_api::{
    db::{create_orm_conn, run_migrations},
    dto::{
        customers::CreateCustomerRequest,
        products::CreateProductRequest,
        transactions::{BulkStatusRequest, CreateTransactionRequest},
    },
    error::AppError,
    models::TransactionStatus,
    routes::params::{ProductQuery, TransactionFilterParams},
    services::{dashboard_service, product_service, transaction_service},
    state::{AppState, Clock},
    store::{DataSource, SeaOrmStore},
};
use sea_orm::{ConnectionTrait, Statement};

// Integration flow against PostgreSQL: seed -> create -> filter -> bulk status -> cascade.
#[tokio::test]
async fn ledger_flow_against_postgres() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run the postgres flow test."
            );
            return Ok(());
        }
    };

    let (state, store) = setup_state(&database_url).await?;

    store
        .insert_customer(CreateCustomerRequest {
            id: Some("C1".into()),
            name: "Warung".into(),
            description: None,
            phone: None,
            address: None,
        })
        .await?;
    let bread = store
        .insert_product(CreateProductRequest {
            name: "Bread".into(),
            description: Some("Sliced white".into()),
            price: Some(1000),
            customer_price: Some(900),
        })
        .await?;

    let user = seller();
    for d in 1..=12 {
        transaction_service::create_transaction(
            &state,
            Some(&user),
            CreateTransactionRequest {
                date: Some(day(2024, 6, d)),
                customer_id: "C1".into(),
                product_id: bread.id,
                order_qty: Some(5),
                return_qty: Some(2),
                status: None,
                notes: None,
            },
        )
        .await?;
    }
    transaction_service::create_transaction(
        &state,
        Some(&user),
        CreateTransactionRequest {
            date: Some(day(2024, 5, 20)),
            customer_id: "C1".into(),
            product_id: bread.id,
            order_qty: Some(1),
            return_qty: None,
            status: None,
            notes: None,
        },
    )
    .await?;

    let params = |page: &str| TransactionFilterParams {
        customer: Some("C1".into()),
        date_filter: Some("thisMonth".into()),
        page: Some(page.into()),
        ..TransactionFilterParams::default()
    };
    let first = transaction_service::list_transactions(&state, params("1"))
        .await?
        .data
        .expect("page data");
    let second = transaction_service::list_transactions(&state, params("2"))
        .await?
        .data
        .expect("page data");
    assert_eq!(first.transactions.len(), 10);
    assert_eq!(second.transactions.len(), 2);
    assert_eq!(first.pagination.total_items, 12);
    assert_eq!(first.stats, second.stats);
    assert_eq!(first.stats.total_billed, 60_000);
    assert_eq!(first.transactions[0].transaction.date, day(2024, 6, 12));
    assert_eq!(
        first.transactions[0].creator.as_ref().map(|p| p.id),
        Some(user.user_id)
    );

    let ids: Vec<i64> = second.transactions.iter().map(|t| t.transaction.id).collect();
    let err = transaction_service::bulk_update_status(
        &state,
        BulkStatusRequest {
            ids: vec![ids[0], -1],
            status: TransactionStatus::Completed,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let row = store.get_transaction(ids[0]).await?.expect("row");
    assert_eq!(row.transaction.status, TransactionStatus::Pending);

    transaction_service::bulk_update_status(
        &state,
        BulkStatusRequest {
            ids: ids.clone(),
            status: TransactionStatus::Completed,
        },
    )
    .await?;
    let row = store.get_transaction(ids[1]).await?.expect("row");
    assert_eq!(row.transaction.status, TransactionStatus::Completed);

    let found = product_service::list_products(
        &state,
        ProductQuery {
            page: Some(1),
            search: Some("SLICED".into()),
        },
    )
    .await?
    .data
    .expect("products");
    assert_eq!(found.items.len(), 1);

    store
        .insert_product(CreateProductRequest {
            name: "Rye 100%".into(),
            description: None,
            price: Some(2000),
            customer_price: None,
        })
        .await?;
    let search = |term: &str| ProductQuery {
        page: Some(1),
        search: Some(term.into()),
    };
    let percent = product_service::list_products(&state, search("%"))
        .await?
        .data
        .expect("products");
    assert_eq!(percent.items.len(), 1);
    assert_eq!(percent.items[0].name, "Rye 100%");
    let underscore = product_service::list_products(&state, search("_"))
        .await?
        .data
        .expect("products");
    assert!(underscore.items.is_empty());

    assert!(store.delete_product(bread.id).await?);
    let stats = dashboard_service::stats(&state).await?.data.expect("stats");
    assert_eq!(stats.counts.transactions, 0);
    assert_eq!(stats.counts.customers, 1);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<(AppState, Arc<SeaOrmStore>)> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE transactions, products, customers, profiles RESTART IDENTITY CASCADE",
    ))
    .await?;

    let store = Arc::new(SeaOrmStore::new(orm));
    let state = AppState::new(store.clone()).with_clock(Clock::Fixed(reference_day()));
    Ok((state, store))
}
