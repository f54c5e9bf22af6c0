use api::{auth::generate_jwt, auth::middleware::log_request, routes::routes};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn,
};
use db::test_utils::setup_test_db;
use serde_json::Value;
use tower::ServiceExt;
use util::state::AppState;

/// Router over a fresh in-memory database, plus the state behind it so tests
/// can seed and inspect rows directly.
pub async fn make_test_app() -> (Router, AppState) {
    let app_state = AppState::new(setup_test_db().await);

    let router = Router::new()
        .nest("/api", routes(app_state.clone()))
        .layer(from_fn(log_request));

    (router, app_state)
}

pub fn bearer(user_id: i64) -> String {
    let (token, _) = generate_jwt(user_id).expect("encode jwt");
    format!("Bearer {token}")
}

/// Sends one request and decodes the JSON envelope.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("Authorization", bearer(id));
    }

    let req = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
