use axum::http::{HeaderName, Request, Response, StatusCode};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::{net::SocketAddr, sync::Arc, time::Duration};

use sales_ledger_api::{
    config::{AppConfig, StoreKind},
    db::{create_orm_conn, run_migrations},
    middleware::trace::{REQUEST_ID_HEADER, request_id, request_span},
    routes::create_app,
    state::AppState,
    store::{DataSource, MemoryStore, SeaOrmStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sales_ledger_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let source: Arc<dyn DataSource> = match config.store {
        StoreKind::Postgres => {
            let orm = create_orm_conn(config.require_database_url()?).await?;
            run_migrations(&orm).await?;
            Arc::new(SeaOrmStore::new(orm))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let mut state = AppState::new(source);
    match config.jwt_secret.as_deref() {
        Some(secret) => state = state.with_jwt_secret(secret),
        None => tracing::warn!("JWT_SECRET not set, authenticated endpoints will reject every request"),
    }

    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| request_span(request))
        .on_request(|request: &Request<_>, _span: &tracing::Span| {
            tracing::info!(
                request_id = %request_id(request),
                method = %request.method(),
                uri = %request.uri(),
                "request started"
            );
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            tracing::info!(
                status = %response.status(),
                ms = %latency.as_millis(),
                "request finished"
            );
        });

    let app = create_app(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(ConcurrencyLimitLayer::new(100));

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!(store = ?config.store, "listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
