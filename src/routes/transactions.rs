use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};

use crate::{
    dto::transactions::{
        BulkStatusRequest, CreateTransactionRequest, TransactionsPage, UpdateTransactionRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::TransactionWithRelations,
    response::{ApiResponse, MutationOutcome},
    routes::params::TransactionFilterParams,
    services::transaction_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/status", patch(bulk_update_status))
        .route(
            "/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(
        ("customer" = Option<String>, Query, description = "Comma-separated customer ids"),
        ("product" = Option<String>, Query, description = "Comma-separated product ids"),
        ("dateFilter" = Option<String>, Query, description = "today, yesterday, thisWeek, thisMonth, thisYear or custom"),
        ("dateFrom" = Option<String>, Query, description = "Custom single date or range start, YYYY-MM-DD"),
        ("dateTo" = Option<String>, Query, description = "Custom range end, YYYY-MM-DD"),
        ("month" = Option<String>, Query, description = "Custom month, 1-12, used with year"),
        ("year" = Option<String>, Query, description = "Custom year"),
        ("page" = Option<String>, Query, description = "Page number, default 1, 10 rows per page"),
    ),
    responses(
        (status = 200, description = "Filtered transactions with totals", body = ApiResponse<TransactionsPage>),
        (status = 400, description = "Invalid filter"),
    ),
    tag = "Transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionFilterParams>,
) -> AppResult<Json<ApiResponse<TransactionsPage>>> {
    let resp = transaction_service::list_transactions(&state, params).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    params(
        ("id" = i64, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Get transaction", body = ApiResponse<TransactionWithRelations>),
        (status = 404, description = "Transaction not found"),
    ),
    tag = "Transactions"
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<TransactionWithRelations>>> {
    let resp = transaction_service::get_transaction(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 200, description = "Create transaction", body = ApiResponse<MutationOutcome>),
        (status = 400, description = "Invalid transaction"),
        (status = 401, description = "User not authenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(payload): Json<CreateTransactionRequest>,
) -> AppResult<Json<ApiResponse<MutationOutcome>>> {
    let resp = transaction_service::create_transaction(&state, user.as_ref(), payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    params(
        ("id" = i64, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Updated transaction", body = ApiResponse<MutationOutcome>),
        (status = 404, description = "Transaction not found"),
    ),
    tag = "Transactions"
)]
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> AppResult<Json<ApiResponse<MutationOutcome>>> {
    let resp = transaction_service::update_transaction(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    params(
        ("id" = i64, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Deleted transaction", body = ApiResponse<MutationOutcome>),
        (status = 404, description = "Transaction not found"),
    ),
    tag = "Transactions"
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<MutationOutcome>>> {
    let resp = transaction_service::delete_transaction(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/transactions/status",
    request_body = BulkStatusRequest,
    responses(
        (status = 200, description = "Status set on every listed transaction", body = ApiResponse<MutationOutcome>),
        (status = 400, description = "Empty id list or unknown ids"),
    ),
    tag = "Transactions"
)]
pub async fn bulk_update_status(
    State(state): State<AppState>,
    Json(payload): Json<BulkStatusRequest>,
) -> AppResult<Json<ApiResponse<MutationOutcome>>> {
    let resp = transaction_service::bulk_update_status(&state, payload).await?;
    Ok(Json(resp))
}
