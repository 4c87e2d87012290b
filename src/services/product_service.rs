use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::{AppError, AppResult},
    models::Product,
    pagination::{PAGE_SIZE, PageWindow, offset_for},
    response::{ApiResponse, Meta, MutationOutcome},
    routes::params::ProductQuery,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let page = query.page();
    let result = state
        .source
        .list_products(query.search_term(), offset_for(page), PAGE_SIZE)
        .await?;

    let window = PageWindow::new(page as i64, result.total);
    let data = ProductList {
        items: result.items,
    };
    Ok(ApiResponse::success(
        "Products",
        data,
        Some(Meta::from_window(&window)),
    ))
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<Product>> {
    let result = match state.source.get_product(id).await? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<MutationOutcome>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    validate_prices(payload.price, payload.customer_price)?;

    let product = state.source.insert_product(payload).await?;
    tracing::info!(product_id = product.id, "product created");
    Ok(MutationOutcome::done("Product created"))
}

pub async fn update_product(
    state: &AppState,
    id: i64,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<MutationOutcome>> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    validate_prices(payload.price, payload.customer_price)?;

    if !state.source.update_product(id, payload).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(product_id = id, "product updated");
    Ok(MutationOutcome::done("Product updated"))
}

pub async fn delete_product(
    state: &AppState,
    id: i64,
) -> AppResult<ApiResponse<MutationOutcome>> {
    if !state.source.delete_product(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(product_id = id, "product deleted");
    Ok(MutationOutcome::done("Product deleted"))
}

fn validate_prices(price: Option<i64>, customer_price: Option<i64>) -> AppResult<()> {
    if price.is_some_and(|p| p < 0) || customer_price.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("prices must not be negative".into()));
    }
    Ok(())
}
