use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    dto::{
        customers::{CreateCustomerRequest, UpdateCustomerRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        transactions::{NewTransaction, UpdateTransactionRequest},
    },
    error::{AppError, AppResult},
    filter::TransactionQuery,
    models::{
        Customer, CustomerRef, Product, ProductRef, Transaction, TransactionStatus,
        TransactionWithRelations, UserProfile,
    },
    store::{DataSource, ProductPage, unknown_ids_error},
};

#[derive(Default)]
struct Tables {
    customers: BTreeMap<String, Customer>,
    products: BTreeMap<i64, Product>,
    transactions: BTreeMap<i64, Transaction>,
    profiles: HashMap<Uuid, UserProfile>,
    next_product_id: i64,
    next_transaction_id: i64,
}

impl Tables {
    fn check_references(&self, customer_id: &str, product_id: i64) -> AppResult<()> {
        if !self.customers.contains_key(customer_id) {
            return Err(AppError::RemoteQuery(format!(
                "transactions.customer_id references unknown customer `{customer_id}`"
            )));
        }
        if !self.products.contains_key(&product_id) {
            return Err(AppError::RemoteQuery(format!(
                "transactions.product_id references unknown product {product_id}"
            )));
        }
        Ok(())
    }

    fn joined(&self, transaction: &Transaction) -> TransactionWithRelations {
        TransactionWithRelations {
            customer: self
                .customers
                .get(&transaction.customer_id)
                .map(CustomerRef::from),
            product: self.products.get(&transaction.product_id).map(ProductRef::from),
            creator: transaction
                .created_by
                .and_then(|id| self.profiles.get(&id).cloned()),
            transaction: transaction.clone(),
        }
    }
}

/// In-process data source with the same semantics as the PostgreSQL schema:
/// foreign keys are checked and deleting a customer or product removes its
/// transactions.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for MemoryStore {
    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let tables = self.tables.read().await;
        let mut customers: Vec<Customer> = tables.customers.values().cloned().collect();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(customers)
    }

    async fn get_customer(&self, id: &str) -> AppResult<Option<Customer>> {
        Ok(self.tables.read().await.customers.get(id).cloned())
    }

    async fn insert_customer(&self, payload: CreateCustomerRequest) -> AppResult<Customer> {
        let mut tables = self.tables.write().await;
        let id = payload
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if tables.customers.contains_key(&id) {
            return Err(AppError::RemoteQuery(format!(
                "duplicate key value violates unique constraint on customers.id `{id}`"
            )));
        }
        let customer = Customer {
            id: id.clone(),
            name: payload.name,
            description: payload.description,
            phone: payload.phone,
            address: payload.address,
            created_at: Utc::now(),
        };
        tables.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, id: &str, payload: UpdateCustomerRequest) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(customer) = tables.customers.get_mut(id) else {
            return Ok(false);
        };
        if let Some(name) = payload.name {
            customer.name = name;
        }
        if let Some(description) = payload.description {
            customer.description = Some(description);
        }
        if let Some(phone) = payload.phone {
            customer.phone = Some(phone);
        }
        if let Some(address) = payload.address {
            customer.address = Some(address);
        }
        Ok(true)
    }

    async fn delete_customer(&self, id: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.customers.remove(id).is_none() {
            return Ok(false);
        }
        tables.transactions.retain(|_, t| t.customer_id != id);
        Ok(true)
    }

    async fn count_customers(&self) -> AppResult<u64> {
        Ok(self.tables.read().await.customers.len() as u64)
    }

    async fn list_products(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> AppResult<ProductPage> {
        let tables = self.tables.read().await;
        let needle = search.map(str::to_lowercase);
        let mut matching: Vec<&Product> = tables
            .products
            .values()
            .filter(|p| match &needle {
                None => true,
                Some(needle) => {
                    p.name.to_lowercase().contains(needle)
                        || p.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(needle))
                }
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(ProductPage { items, total })
    }

    async fn get_product(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn insert_product(&self, payload: CreateProductRequest) -> AppResult<Product> {
        let mut tables = self.tables.write().await;
        tables.next_product_id += 1;
        let product = Product {
            id: tables.next_product_id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            customer_price: payload.customer_price,
            created_at: Utc::now(),
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i64, payload: UpdateProductRequest) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(name) = payload.name {
            product.name = name;
        }
        if let Some(description) = payload.description {
            product.description = Some(description);
        }
        if let Some(price) = payload.price {
            product.price = Some(price);
        }
        if let Some(customer_price) = payload.customer_price {
            product.customer_price = Some(customer_price);
        }
        Ok(true)
    }

    async fn delete_product(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.products.remove(&id).is_none() {
            return Ok(false);
        }
        tables.transactions.retain(|_, t| t.product_id != id);
        Ok(true)
    }

    async fn count_products(&self) -> AppResult<u64> {
        Ok(self.tables.read().await.products.len() as u64)
    }

    async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> AppResult<Vec<TransactionWithRelations>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Transaction> = tables
            .transactions
            .values()
            .filter(|t| query.matches(t))
            .collect();
        rows.sort_by(|a, b| query.compare(a, b));
        Ok(rows.into_iter().map(|t| tables.joined(t)).collect())
    }

    async fn get_transaction(&self, id: i64) -> AppResult<Option<TransactionWithRelations>> {
        let tables = self.tables.read().await;
        Ok(tables.transactions.get(&id).map(|t| tables.joined(t)))
    }

    async fn insert_transaction(&self, new: NewTransaction) -> AppResult<Transaction> {
        let mut tables = self.tables.write().await;
        tables.check_references(&new.customer_id, new.product_id)?;
        tables.next_transaction_id += 1;
        let transaction = Transaction {
            id: tables.next_transaction_id,
            date: new.date,
            customer_id: new.customer_id,
            product_id: new.product_id,
            order_qty: new.order_qty,
            return_qty: new.return_qty,
            status: new.status,
            notes: new.notes,
            created_by: Some(new.created_by),
            created_at: Utc::now(),
        };
        tables
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        id: i64,
        payload: UpdateTransactionRequest,
    ) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(mut updated) = tables.transactions.get(&id).cloned() else {
            return Ok(false);
        };
        if let Some(date) = payload.date {
            updated.date = date;
        }
        if let Some(customer_id) = payload.customer_id {
            updated.customer_id = customer_id;
        }
        if let Some(product_id) = payload.product_id {
            updated.product_id = product_id;
        }
        if let Some(order_qty) = payload.order_qty {
            updated.order_qty = Some(order_qty);
        }
        if let Some(return_qty) = payload.return_qty {
            updated.return_qty = Some(return_qty);
        }
        if let Some(status) = payload.status {
            updated.status = status;
        }
        if let Some(notes) = payload.notes {
            updated.notes = Some(notes);
        }
        tables.check_references(&updated.customer_id, updated.product_id)?;
        tables.transactions.insert(id, updated);
        Ok(true)
    }

    async fn delete_transaction(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.transactions.remove(&id).is_some())
    }

    async fn set_transaction_status(
        &self,
        ids: &[i64],
        status: TransactionStatus,
    ) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !tables.transactions.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(unknown_ids_error(&missing));
        }

        let mut affected = 0;
        for transaction in tables
            .transactions
            .values_mut()
            .filter(|t| ids.contains(&t.id))
        {
            transaction.status = status;
            affected += 1;
        }
        Ok(affected)
    }

    async fn count_transactions(&self) -> AppResult<u64> {
        Ok(self.tables.read().await.transactions.len() as u64)
    }

    async fn upsert_profile(&self, profile: UserProfile) -> AppResult<()> {
        self.tables
            .write()
            .await
            .profiles
            .insert(profile.id, profile);
        Ok(())
    }
}
