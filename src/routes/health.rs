use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub store: String,
    pub today: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; `store` reports whether the data source answered", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let store = match state.source.count_products().await {
        Ok(_) => "ok",
        Err(err) => {
            tracing::warn!(error = %err, "data source probe failed");
            "unavailable"
        }
    };

    let data = HealthData {
        status: "ok".to_string(),
        store: store.to_string(),
        today: state.today().to_string(),
    };

    Json(ApiResponse::success("Health check", data, Some(Meta::empty())))
}
