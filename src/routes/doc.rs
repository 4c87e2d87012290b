use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    aggregate::Totals,
    dto::{
        customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
        dashboard::{DashboardStats, EntityCounts},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        transactions::{
            BulkStatusRequest, CreateTransactionRequest, TransactionsPage,
            UpdateTransactionRequest,
        },
    },
    models::{
        Customer, CustomerRef, Product, ProductRef, Transaction, TransactionStatus,
        TransactionWithRelations, UserProfile,
    },
    pagination::PageInfo,
    response::{ApiResponse, Meta, MutationOutcome},
    routes::{customers, dashboard, health, params, products, transactions},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        transactions::list_transactions,
        transactions::get_transaction,
        transactions::create_transaction,
        transactions::update_transaction,
        transactions::delete_transaction,
        transactions::bulk_update_status,
        dashboard::dashboard_stats
    ),
    components(
        schemas(
            Customer,
            Product,
            UserProfile,
            Transaction,
            TransactionStatus,
            TransactionWithRelations,
            CustomerRef,
            ProductRef,
            Totals,
            PageInfo,
            EntityCounts,
            DashboardStats,
            TransactionsPage,
            CustomerList,
            ProductList,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CreateTransactionRequest,
            UpdateTransactionRequest,
            BulkStatusRequest,
            params::ProductQuery,
            params::TransactionFilterParams,
            MutationOutcome,
            Meta,
            ApiResponse<Product>,
            ApiResponse<Customer>,
            ApiResponse<ProductList>,
            ApiResponse<CustomerList>,
            ApiResponse<TransactionsPage>,
            ApiResponse<DashboardStats>,
            ApiResponse<MutationOutcome>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Transactions", description = "Order and return transactions"),
        (name = "Dashboard", description = "Aggregate statistics"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
