mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use common::{add_customer, add_product, memory_state, seller};
use jsonwebtoken::{EncodingKey, Header, encode};
use sales_ledger_api::{middleware::auth::Claims, routes::create_app};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "route-test-secret";

async fn app() -> anyhow::Result<(Router, i64)> {
    let (state, store) = memory_state();
    add_customer(&store, "C1").await?;
    let bread = add_product(&store, "Bread", Some(1000)).await?;
    Ok((create_app(state.with_jwt_secret(SECRET)), bread))
}

fn token(secret: &str) -> String {
    let claims = Claims {
        sub: seller().user_id.to_string(),
        email: Some("seller@example.com".into()),
        name: Some("Seller".into()),
        exp: 4_102_444_800,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token encodes")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request builds");

    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn new_transaction(product_id: i64) -> Value {
    json!({
        "customer_id": "C1",
        "product_id": product_id,
        "order_qty": 5,
        "return_qty": 2,
    })
}

#[tokio::test]
async fn invalid_filter_is_a_bad_request() -> anyhow::Result<()> {
    let (app, _) = app().await?;
    let (status, body) = send(&app, Method::GET, "/api/transactions?dateFilter=lastDecade", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap_or_default().starts_with("Invalid filter"));

    let (status, _) = send(&app, Method::GET, "/api/transactions?page=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn create_without_valid_token_is_unauthorized() -> anyhow::Result<()> {
    let (app, bread) = app().await?;

    let (status, body) = send(&app, Method::POST, "/api/transactions", None, Some(new_transaction(bread))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not authenticated");

    let forged = token("some-other-secret");
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(&forged),
        Some(new_transaction(bread)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn signed_in_user_creates_and_lists_transactions() -> anyhow::Result<()> {
    let (app, bread) = app().await?;
    let token = token(SECRET);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/transactions",
        Some(&token),
        Some(new_transaction(bread)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], true);

    let (status, body) = send(&app, Method::GET, "/api/transactions?customer=C1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["pagination"]["totalItems"], 1);
    assert_eq!(data["pagination"]["currentPage"], 1);
    assert_eq!(data["stats"]["totalBilled"], 5000);
    assert_eq!(data["stats"]["totalReturned"], 2000);
    let row = &data["transactions"][0];
    assert_eq!(row["date"], "2024-06-15");
    assert_eq!(row["status"], "pending");
    assert_eq!(row["customer"]["name"], "Customer C1");
    assert_eq!(row["creator"]["email"], "seller@example.com");

    let id = row["id"].as_i64().expect("numeric id");
    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/transactions/status",
        None,
        Some(json!({ "ids": [id], "status": "delivered" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/api/transactions/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "delivered");
    Ok(())
}

#[tokio::test]
async fn crud_routes_report_missing_rows() -> anyhow::Result<()> {
    let (app, _) = app().await?;

    let (status, _) = send(&app, Method::GET, "/api/transactions/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/products/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/nowhere");
    Ok(())
}

#[tokio::test]
async fn products_search_and_dashboard_stats() -> anyhow::Result<()> {
    let (app, _) = app().await?;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/products",
        None,
        Some(json!({ "name": "Chocolate bun", "price": 6000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/products?search=choc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["meta"]["total"], 1);

    send(
        &app,
        Method::POST,
        "/api/products",
        None,
        Some(json!({ "name": "Rye 100%", "price": 2000 })),
    )
    .await;
    let (_, body) = send(&app, Method::GET, "/api/products?search=%25", None, None).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["name"], "Rye 100%");
    let (_, body) = send(&app, Method::GET, "/api/products?search=_", None, None).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let (status, body) = send(&app, Method::GET, "/api/dashboard/stats", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["counts"]["products"], 3);
    assert_eq!(body["data"]["counts"]["customers"], 1);
    assert_eq!(body["data"]["stats"]["totalOrder"], 0);
    Ok(())
}
