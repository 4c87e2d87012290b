use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
    error::AppResult,
    models::Customer,
    response::{ApiResponse, MutationOutcome},
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "List customers, newest first", body = ApiResponse<CustomerList>)
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    Ok(Json(customer_service::list_customers(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Get customer", body = ApiResponse<Customer>),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    Ok(Json(customer_service::get_customer(&state, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Create customer", body = ApiResponse<MutationOutcome>),
        (status = 400, description = "Invalid customer"),
    ),
    tag = "Customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<Json<ApiResponse<MutationOutcome>>> {
    Ok(Json(customer_service::create_customer(&state, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Updated customer", body = ApiResponse<MutationOutcome>),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> AppResult<Json<ApiResponse<MutationOutcome>>> {
    Ok(Json(
        customer_service::update_customer(&state, &id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Deleted customer", body = ApiResponse<MutationOutcome>),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MutationOutcome>>> {
    Ok(Json(customer_service::delete_customer(&state, &id).await?))
}
