use crate::{
    aggregate::Totals,
    dto::dashboard::{DashboardStats, EntityCounts},
    error::AppResult,
    filter::TransactionQuery,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Entity counts plus totals over every transaction.
pub async fn stats(state: &AppState) -> AppResult<ApiResponse<DashboardStats>> {
    let everything = TransactionQuery::all();
    let (products, customers, transactions, rows) = tokio::try_join!(
        state.source.count_products(),
        state.source.count_customers(),
        state.source.count_transactions(),
        state.source.list_transactions(&everything),
    )?;

    let data = DashboardStats {
        counts: EntityCounts {
            products,
            customers,
            transactions,
        },
        stats: Totals::from_rows(&rows)?,
    };
    Ok(ApiResponse::success(
        "Dashboard stats",
        data,
        Some(Meta::empty()),
    ))
}
