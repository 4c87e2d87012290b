use chrono::{Days, Local};
use sales_ledger_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        customers::CreateCustomerRequest, products::CreateProductRequest,
        transactions::NewTransaction,
    },
    models::{TransactionStatus, UserProfile},
    store::{DataSource, SeaOrmStore},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(config.require_database_url()?).await?;
    run_migrations(&orm).await?;
    let store = SeaOrmStore::new(orm);

    if store.count_customers().await? > 0 {
        println!("Database already has customers, skipping seed");
        return Ok(());
    }

    let seller = UserProfile {
        id: Uuid::new_v4(),
        email: Some("seller@example.com".to_string()),
        full_name: Some("Demo Seller".to_string()),
    };
    store.upsert_profile(seller.clone()).await?;

    let customers = seed_customers(&store).await?;
    let products = seed_products(&store).await?;
    let created = seed_transactions(&store, seller.id, &customers, &products).await?;

    println!(
        "Seed completed: {} customers, {} products, {created} transactions",
        customers.len(),
        products.len()
    );
    Ok(())
}

async fn seed_customers(store: &SeaOrmStore) -> anyhow::Result<Vec<String>> {
    let customers = [
        ("C1", "Warung Bu Sri", "Jl. Melati 4"),
        ("C2", "Toko Makmur", "Jl. Kenanga 12"),
        ("C3", "Kios Pasar Baru", "Pasar Baru Blok B"),
    ];

    let mut ids = Vec::with_capacity(customers.len());
    for (id, name, address) in customers {
        let customer = store
            .insert_customer(CreateCustomerRequest {
                id: Some(id.to_string()),
                name: name.to_string(),
                description: None,
                phone: None,
                address: Some(address.to_string()),
            })
            .await?;
        ids.push(customer.id);
    }
    println!("Seeded customers");
    Ok(ids)
}

async fn seed_products(store: &SeaOrmStore) -> anyhow::Result<Vec<i64>> {
    let products = [
        ("Roti Tawar", "Sliced white bread", 15_000, 13_500),
        ("Roti Coklat", "Chocolate bun", 6_000, 5_000),
        ("Donat Gula", "Sugar doughnut", 4_000, 3_500),
    ];

    let mut ids = Vec::with_capacity(products.len());
    for (name, desc, price, customer_price) in products {
        let product = store
            .insert_product(CreateProductRequest {
                name: name.to_string(),
                description: Some(desc.to_string()),
                price: Some(price),
                customer_price: Some(customer_price),
            })
            .await?;
        ids.push(product.id);
    }
    println!("Seeded products");
    Ok(ids)
}

/// One delivery per customer and product on each of the last 14 days.
async fn seed_transactions(
    store: &SeaOrmStore,
    seller: Uuid,
    customers: &[String],
    products: &[i64],
) -> anyhow::Result<usize> {
    let today = Local::now().date_naive();
    let mut created = 0;

    for back in 0..14u64 {
        let Some(date) = today.checked_sub_days(Days::new(back)) else {
            continue;
        };
        let status = match back {
            0 => TransactionStatus::Pending,
            1..=2 => TransactionStatus::Delivered,
            _ => TransactionStatus::Completed,
        };
        for (ci, customer_id) in customers.iter().enumerate() {
            for (pi, product_id) in products.iter().enumerate() {
                let order = 5 + ((back as usize + ci + pi) % 7) as i32;
                let returned = ((back as usize + pi) % 3) as i32;
                store
                    .insert_transaction(NewTransaction {
                        date,
                        customer_id: customer_id.clone(),
                        product_id: *product_id,
                        order_qty: Some(order),
                        return_qty: Some(returned),
                        status,
                        notes: None,
                        created_by: seller,
                    })
                    .await?;
                created += 1;
            }
        }
    }
    Ok(created)
}
