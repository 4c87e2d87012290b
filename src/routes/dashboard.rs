use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::DashboardStats, error::AppResult, response::ApiResponse,
    services::dashboard_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(dashboard_stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Entity counts and totals over all transactions", body = ApiResponse<DashboardStats>),
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    Ok(Json(dashboard_service::stats(&state).await?))
}
