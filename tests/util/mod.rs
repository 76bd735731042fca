use axum::{body::Body, http::Request, Router};
use gridiron::{config::Config, model::app::AppState, router, startup};
use gridiron_test_utils::TestSetup;
use serde_json::Value;
use tower::ServiceExt;

/// Build the full application router against the test database and the
/// mock remote host.
pub fn app(test: &TestSetup) -> Router {
    let mut config = Config::new("sqlite::memory:".to_string(), test.server.url());
    config.retry_backoff_base_ms = 10;

    let state: AppState = startup::build_state(config, test.db.clone()).expect("state builds");
    router::routes().with_state(state)
}

pub fn get(uri: &str, user_id: Option<i32>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, user_id: Option<i32>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (u16, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
