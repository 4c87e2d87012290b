use crate::{
    dto::customers::{CreateCustomerRequest, CustomerList, UpdateCustomerRequest},
    error::{AppError, AppResult},
    filter::state::is_encodable_id,
    models::Customer,
    response::{ApiResponse, Meta, MutationOutcome},
    state::AppState,
};

pub async fn list_customers(state: &AppState) -> AppResult<ApiResponse<CustomerList>> {
    let items = state.source.list_customers().await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get_customer(state: &AppState, id: &str) -> AppResult<ApiResponse<Customer>> {
    let customer = match state.source.get_customer(id).await? {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Customer", customer, None))
}

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<MutationOutcome>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if let Some(id) = payload.id.as_deref() {
        if !is_encodable_id(id) {
            return Err(AppError::BadRequest(format!(
                "customer id `{id}` must be non-empty, have no surrounding spaces or commas, and not be `all`"
            )));
        }
    }

    let customer = state.source.insert_customer(payload).await?;
    tracing::info!(customer_id = %customer.id, "customer created");
    Ok(MutationOutcome::done("Customer created"))
}

pub async fn update_customer(
    state: &AppState,
    id: &str,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<MutationOutcome>> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if !state.source.update_customer(id, payload).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(customer_id = id, "customer updated");
    Ok(MutationOutcome::done("Customer updated"))
}

pub async fn delete_customer(
    state: &AppState,
    id: &str,
) -> AppResult<ApiResponse<MutationOutcome>> {
    if !state.source.delete_customer(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(customer_id = id, "customer deleted");
    Ok(MutationOutcome::done("Customer deleted"))
}
