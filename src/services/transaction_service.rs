use crate::{
    aggregate::Totals,
    dto::transactions::{
        BulkStatusRequest, CreateTransactionRequest, NewTransaction, TransactionsPage,
        UpdateTransactionRequest,
    },
    error::{AppError, AppResult},
    filter::{FilterState, TransactionQuery},
    middleware::auth::AuthUser,
    models::TransactionWithRelations,
    pagination::PageWindow,
    response::{ApiResponse, Meta, MutationOutcome},
    routes::params::TransactionFilterParams,
    state::AppState,
};

/// Lists one page of filtered transactions together with totals over the
/// whole filtered set.
pub async fn list_transactions(
    state: &AppState,
    params: TransactionFilterParams,
) -> AppResult<ApiResponse<TransactionsPage>> {
    let filters = FilterState::from_params(&params).inspect_err(|err| {
        tracing::warn!(error = %err, ?params, "rejected transaction filter");
    })?;
    let query = TransactionQuery::build(&filters, state.today())?;
    tracing::debug!(
        predicates = query.predicates.len(),
        range = ?query.date_range(),
        "transaction query built"
    );

    let rows = state.source.list_transactions(&query).await?;
    let stats = Totals::from_rows(&rows)?;
    let window = PageWindow::new(filters.page() as i64, rows.len() as u64);
    tracing::debug!(
        page = window.page,
        total_pages = window.total_pages,
        total_items = window.total_items,
        "transaction page window"
    );

    let data = TransactionsPage {
        transactions: window.slice(rows),
        pagination: window.info(),
        stats,
    };
    Ok(ApiResponse::success(
        "Transactions",
        data,
        Some(Meta::from_window(&window)),
    ))
}

pub async fn get_transaction(
    state: &AppState,
    id: i64,
) -> AppResult<ApiResponse<TransactionWithRelations>> {
    let transaction = match state.source.get_transaction(id).await? {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Transaction", transaction, None))
}

/// Records a transaction on behalf of `user`, who becomes its creator.
pub async fn create_transaction(
    state: &AppState,
    user: Option<&AuthUser>,
    payload: CreateTransactionRequest,
) -> AppResult<ApiResponse<MutationOutcome>> {
    let Some(user) = user else {
        return Err(AppError::NotAuthenticated);
    };
    validate_quantities(payload.order_qty, payload.return_qty)?;
    if payload.customer_id.trim().is_empty() {
        return Err(AppError::BadRequest("customer_id is required".into()));
    }

    state.source.upsert_profile(user.profile()).await?;

    let new = NewTransaction {
        date: payload.date.unwrap_or_else(|| state.today()),
        customer_id: payload.customer_id,
        product_id: payload.product_id,
        order_qty: payload.order_qty,
        return_qty: payload.return_qty,
        status: payload.status.unwrap_or_default(),
        notes: payload.notes,
        created_by: user.user_id,
    };
    let transaction = state.source.insert_transaction(new).await?;
    tracing::info!(
        transaction_id = transaction.id,
        user_id = %user.user_id,
        "transaction created"
    );

    Ok(MutationOutcome::done("Transaction created"))
}

pub async fn update_transaction(
    state: &AppState,
    id: i64,
    payload: UpdateTransactionRequest,
) -> AppResult<ApiResponse<MutationOutcome>> {
    validate_quantities(payload.order_qty, payload.return_qty)?;
    if !state.source.update_transaction(id, payload).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(transaction_id = id, "transaction updated");
    Ok(MutationOutcome::done("Transaction updated"))
}

pub async fn delete_transaction(
    state: &AppState,
    id: i64,
) -> AppResult<ApiResponse<MutationOutcome>> {
    if !state.source.delete_transaction(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(transaction_id = id, "transaction deleted");
    Ok(MutationOutcome::done("Transaction deleted"))
}

/// Sets one status on a list of transactions in a single request.
pub async fn bulk_update_status(
    state: &AppState,
    payload: BulkStatusRequest,
) -> AppResult<ApiResponse<MutationOutcome>> {
    let mut ids = payload.ids;
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".into()));
    }

    let affected = state
        .source
        .set_transaction_status(&ids, payload.status)
        .await?;
    tracing::info!(
        affected,
        status = %payload.status,
        "transaction status updated in bulk"
    );
    Ok(MutationOutcome::done("Transaction status updated"))
}

fn validate_quantities(order_qty: Option<i32>, return_qty: Option<i32>) -> AppResult<()> {
    if order_qty.is_some_and(|q| q < 0) {
        return Err(AppError::BadRequest("order_qty must not be negative".into()));
    }
    if return_qty.is_some_and(|q| q < 0) {
        return Err(AppError::BadRequest("return_qty must not be negative".into()));
    }
    Ok(())
}
