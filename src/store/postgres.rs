use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::{
        customers::{CreateCustomerRequest, UpdateCustomerRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        transactions::{NewTransaction, UpdateTransactionRequest},
    },
    entity::{
        customers::{
            ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers,
            Model as CustomerModel,
        },
        products::{
            ActiveModel as ProductActive, Column as ProductCol, Entity as Products,
            Model as ProductModel,
        },
        profiles::{
            ActiveModel as ProfileActive, Column as ProfileCol, Entity as Profiles,
            Model as ProfileModel,
        },
        transactions::{
            ActiveModel as TransactionActive, Column as TransactionCol, Entity as Transactions,
            Model as TransactionModel,
        },
    },
    error::AppResult,
    filter::{Predicate, SortColumn, TransactionQuery},
    models::{
        Customer, CustomerRef, Product, ProductRef, Transaction, TransactionStatus,
        TransactionWithRelations, UserProfile,
    },
    routes::params::SortOrder,
    store::{DataSource, ProductPage, unknown_ids_error},
};

/// PostgreSQL-backed data source.
#[derive(Clone)]
pub struct SeaOrmStore {
    orm: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.orm
    }

    /// Batch-loads the customer, product and creator rows referenced by
    /// `rows` and attaches their display fields.
    async fn join_relations(
        &self,
        rows: Vec<TransactionModel>,
    ) -> AppResult<Vec<TransactionWithRelations>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let customer_ids: HashSet<String> = rows.iter().map(|r| r.customer_id.clone()).collect();
        let product_ids: HashSet<i64> = rows.iter().map(|r| r.product_id).collect();
        let creator_ids: HashSet<Uuid> = rows.iter().filter_map(|r| r.created_by).collect();

        let customers: HashMap<String, CustomerRef> = Customers::find()
            .filter(CustomerCol::Id.is_in(customer_ids))
            .all(&self.orm)
            .await?
            .into_iter()
            .map(|m| {
                let customer = customer_from_entity(m);
                (customer.id.clone(), CustomerRef::from(&customer))
            })
            .collect();

        let products: HashMap<i64, ProductRef> = Products::find()
            .filter(ProductCol::Id.is_in(product_ids))
            .all(&self.orm)
            .await?
            .into_iter()
            .map(|m| {
                let product = product_from_entity(m);
                (product.id, ProductRef::from(&product))
            })
            .collect();

        let creators: HashMap<Uuid, UserProfile> = if creator_ids.is_empty() {
            HashMap::new()
        } else {
            Profiles::find()
                .filter(ProfileCol::Id.is_in(creator_ids))
                .all(&self.orm)
                .await?
                .into_iter()
                .map(|m| (m.id, profile_from_entity(m)))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|model| {
                let transaction = transaction_from_entity(model);
                TransactionWithRelations {
                    customer: customers.get(&transaction.customer_id).cloned(),
                    product: products.get(&transaction.product_id).cloned(),
                    creator: transaction
                        .created_by
                        .and_then(|id| creators.get(&id).cloned()),
                    transaction,
                }
            })
            .collect())
    }
}

#[async_trait]
impl DataSource for SeaOrmStore {
    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(Customers::find()
            .order_by_desc(CustomerCol::CreatedAt)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(customer_from_entity)
            .collect())
    }

    async fn get_customer(&self, id: &str) -> AppResult<Option<Customer>> {
        Ok(Customers::find_by_id(id.to_string())
            .one(&self.orm)
            .await?
            .map(customer_from_entity))
    }

    async fn insert_customer(&self, payload: CreateCustomerRequest) -> AppResult<Customer> {
        let id = payload
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let active = CustomerActive {
            id: Set(id),
            name: Set(payload.name),
            description: Set(payload.description),
            phone: Set(payload.phone),
            address: Set(payload.address),
            created_at: NotSet,
        };
        Ok(customer_from_entity(active.insert(&self.orm).await?))
    }

    async fn update_customer(&self, id: &str, payload: UpdateCustomerRequest) -> AppResult<bool> {
        let Some(existing) = Customers::find_by_id(id.to_string()).one(&self.orm).await? else {
            return Ok(false);
        };

        let mut active: CustomerActive = existing.into();
        if let Some(name) = payload.name {
            active.name = Set(name);
        }
        if let Some(description) = payload.description {
            active.description = Set(Some(description));
        }
        if let Some(phone) = payload.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = payload.address {
            active.address = Set(Some(address));
        }
        active.update(&self.orm).await?;
        Ok(true)
    }

    async fn delete_customer(&self, id: &str) -> AppResult<bool> {
        let result = Customers::delete_by_id(id.to_string())
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_customers(&self) -> AppResult<u64> {
        Ok(Customers::find().count(&self.orm).await?)
    }

    async fn list_products(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> AppResult<ProductPage> {
        let mut condition = Condition::all();
        if let Some(search) = search {
            let pattern = contains_pattern(search);
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(ProductCol::Name).ilike(pattern.clone()))
                    .add(Expr::col(ProductCol::Description).ilike(pattern)),
            );
        }

        let finder = Products::find()
            .filter(condition)
            .order_by_desc(ProductCol::CreatedAt)
            .order_by_desc(ProductCol::Id);

        let total = finder.clone().count(&self.orm).await?;
        let items = finder
            .limit(limit)
            .offset(offset)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();

        Ok(ProductPage { items, total })
    }

    async fn get_product(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity))
    }

    async fn insert_product(&self, payload: CreateProductRequest) -> AppResult<Product> {
        let active = ProductActive {
            id: NotSet,
            name: Set(payload.name),
            description: Set(payload.description),
            price: Set(payload.price),
            customer_price: Set(payload.customer_price),
            created_at: NotSet,
        };
        Ok(product_from_entity(active.insert(&self.orm).await?))
    }

    async fn update_product(&self, id: i64, payload: UpdateProductRequest) -> AppResult<bool> {
        let Some(existing) = Products::find_by_id(id).one(&self.orm).await? else {
            return Ok(false);
        };

        let mut active: ProductActive = existing.into();
        if let Some(name) = payload.name {
            active.name = Set(name);
        }
        if let Some(description) = payload.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = payload.price {
            active.price = Set(Some(price));
        }
        if let Some(customer_price) = payload.customer_price {
            active.customer_price = Set(Some(customer_price));
        }
        active.update(&self.orm).await?;
        Ok(true)
    }

    async fn delete_product(&self, id: i64) -> AppResult<bool> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_products(&self) -> AppResult<u64> {
        Ok(Products::find().count(&self.orm).await?)
    }

    async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> AppResult<Vec<TransactionWithRelations>> {
        let rows = apply_query(Transactions::find(), query)
            .all(&self.orm)
            .await?;
        tracing::debug!(rows = rows.len(), "transactions fetched");
        self.join_relations(rows).await
    }

    async fn get_transaction(&self, id: i64) -> AppResult<Option<TransactionWithRelations>> {
        let Some(row) = Transactions::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };
        Ok(self.join_relations(vec![row]).await?.pop())
    }

    async fn insert_transaction(&self, new: NewTransaction) -> AppResult<Transaction> {
        let active = TransactionActive {
            id: NotSet,
            date: Set(new.date),
            customer_id: Set(new.customer_id),
            product_id: Set(new.product_id),
            order_qty: Set(new.order_qty),
            return_qty: Set(new.return_qty),
            status: Set(Some(new.status.as_str().to_string())),
            notes: Set(new.notes),
            created_by: Set(Some(new.created_by)),
            created_at: NotSet,
        };
        Ok(transaction_from_entity(active.insert(&self.orm).await?))
    }

    async fn update_transaction(
        &self,
        id: i64,
        payload: UpdateTransactionRequest,
    ) -> AppResult<bool> {
        let Some(existing) = Transactions::find_by_id(id).one(&self.orm).await? else {
            return Ok(false);
        };

        let mut active: TransactionActive = existing.into();
        if let Some(date) = payload.date {
            active.date = Set(date);
        }
        if let Some(customer_id) = payload.customer_id {
            active.customer_id = Set(customer_id);
        }
        if let Some(product_id) = payload.product_id {
            active.product_id = Set(product_id);
        }
        if let Some(order_qty) = payload.order_qty {
            active.order_qty = Set(Some(order_qty));
        }
        if let Some(return_qty) = payload.return_qty {
            active.return_qty = Set(Some(return_qty));
        }
        if let Some(status) = payload.status {
            active.status = Set(Some(status.as_str().to_string()));
        }
        if let Some(notes) = payload.notes {
            active.notes = Set(Some(notes));
        }
        active.update(&self.orm).await?;
        Ok(true)
    }

    async fn delete_transaction(&self, id: i64) -> AppResult<bool> {
        let result = Transactions::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }

    async fn set_transaction_status(
        &self,
        ids: &[i64],
        status: TransactionStatus,
    ) -> AppResult<u64> {
        let txn = self.orm.begin().await?;

        let found: HashSet<i64> = Transactions::find()
            .select_only()
            .column(TransactionCol::Id)
            .filter(TransactionCol::Id.is_in(ids.iter().copied()))
            .into_tuple::<i64>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();
        let missing: Vec<i64> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
        if !missing.is_empty() {
            txn.rollback().await?;
            return Err(unknown_ids_error(&missing));
        }

        let result = Transactions::update_many()
            .col_expr(TransactionCol::Status, Expr::value(status.as_str()))
            .filter(TransactionCol::Id.is_in(ids.iter().copied()))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        Ok(result.rows_affected)
    }

    async fn count_transactions(&self) -> AppResult<u64> {
        Ok(Transactions::find().count(&self.orm).await?)
    }

    async fn upsert_profile(&self, profile: UserProfile) -> AppResult<()> {
        let active = ProfileActive {
            id: Set(profile.id),
            email: Set(profile.email),
            full_name: Set(profile.full_name),
        };
        Profiles::insert(active)
            .on_conflict(
                OnConflict::column(ProfileCol::Id)
                    .update_columns([ProfileCol::Email, ProfileCol::FullName])
                    .to_owned(),
            )
            .exec(&self.orm)
            .await?;
        Ok(())
    }
}

/// Adds the query's predicates and sort keys to a transaction select.
pub fn apply_query(
    mut finder: Select<Transactions>,
    query: &TransactionQuery,
) -> Select<Transactions> {
    let mut condition = Condition::all();
    for predicate in &query.predicates {
        condition = match predicate {
            Predicate::CustomerIn(ids) => {
                condition.add(TransactionCol::CustomerId.is_in(ids.iter().cloned()))
            }
            Predicate::ProductIn(ids) => {
                condition.add(TransactionCol::ProductId.is_in(ids.iter().copied()))
            }
            Predicate::DateBetween { from, to } => {
                condition.add(TransactionCol::Date.between(*from, *to))
            }
        };
    }
    finder = finder.filter(condition);

    for key in &query.sort {
        let column = match key.column {
            SortColumn::Date => TransactionCol::Date,
            SortColumn::Id => TransactionCol::Id,
        };
        finder = match key.order {
            SortOrder::Asc => finder.order_by_asc(column),
            SortOrder::Desc => finder.order_by_desc(column),
        };
    }
    finder
}

/// `ILIKE` pattern matching `term` as a literal substring. Postgres treats
/// backslash as the default escape character.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        description: model.description,
        phone: model.phone,
        address: model.address,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        customer_price: model.customer_price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn profile_from_entity(model: ProfileModel) -> UserProfile {
    UserProfile {
        id: model.id,
        email: model.email,
        full_name: model.full_name,
    }
}

fn transaction_from_entity(model: TransactionModel) -> Transaction {
    Transaction {
        id: model.id,
        date: model.date,
        customer_id: model.customer_id,
        product_id: model.product_id,
        order_qty: model.order_qty,
        return_qty: model.return_qty,
        status: TransactionStatus::from_stored(model.status.as_deref()),
        notes: model.notes,
        created_by: model.created_by,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
