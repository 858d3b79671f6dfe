//! HTTP surface tests against an in-memory store.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;

use osb_core::{BenchmarkResult, Specs, User};
use osb_server::http::{build_router, hash_password};

use common::MemoryStore;

fn app(store: &Arc<MemoryStore>) -> Router {
    build_router(store.clone())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn basic(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}

async fn register(store: &Arc<MemoryStore>, name: &str, password: &str) -> i64 {
    let request = Request::post("/api/users/register")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "username={}&email={}%40test.com&password={}",
            name, name, password
        )))
        .unwrap();
    let (status, body) = send(app(store), request).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_i64().unwrap()
}

fn submission() -> Value {
    json!({
        "scores": [
            {"name": "Total", "time": "1.5s", "score": 1042.5},
            {"name": "Fibonacci", "time": "250ms", "score": 88.0}
        ],
        "specs": {
            "vendor": "GenuineIntel",
            "model": "Intel(R) Core(TM) i7",
            "threads": "8",
            "overclocked": false
        }
    })
}

#[tokio::test]
async fn only_api_routes_are_served() {
    let store = Arc::new(MemoryStore::new());
    let (status, _) = send(app(&store), get("/health")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(&store), get("/users")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(app(&store), get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn register_hashes_password_and_lists_public_view() {
    let store = Arc::new(MemoryStore::new());
    let id = register(&store, "test", "supersecretpassword").await;

    let stored = store.rows::<User>();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "test@test.com");
    assert_eq!(stored[0].password_hash, hash_password("supersecretpassword"));

    let (status, body) = send(app(&store), get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": id, "name": "test"}]));

    let (status, body) = send(app(&store), get(&format!("/api/users/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": id, "name": "test"}));
}

#[tokio::test]
async fn missing_record_is_a_generic_500() {
    let store = Arc::new(MemoryStore::new());
    let (status, body) = send(app(&store), get("/api/results/42")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
}

#[tokio::test]
async fn user_update_and_delete() {
    let store = Arc::new(MemoryStore::new());
    let id = register(&store, "test", "supersecretpassword").await;

    let (status, body) = send(
        app(&store),
        post_json(
            &format!("/api/users/update/{}", id),
            json!({"username": "test", "email": "test@test.com", "password": "newsupersecretpassword"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
    assert_eq!(
        store.rows::<User>()[0].password_hash,
        hash_password("newsupersecretpassword")
    );

    let request = Request::post(format!("/api/users/delete/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&store), request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(&store), get(&format!("/api/users/{}", id))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn submit_requires_basic_auth() {
    let store = Arc::new(MemoryStore::new());
    register(&store, "test", "supersecretpassword").await;

    let (status, body) = send(app(&store), post_json("/api/results/submit", submission())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let mut request = post_json("/api/results/submit", submission());
    request.headers_mut().insert(
        header::AUTHORIZATION,
        basic("test", "wrongpassword").parse().unwrap(),
    );
    let (status, _) = send(app(&store), request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert!(store.rows::<BenchmarkResult>().is_empty());
    assert!(store.rows::<Specs>().is_empty());
}

#[tokio::test]
async fn submit_stores_result_then_specs() {
    let store = Arc::new(MemoryStore::new());
    let user_id = register(&store, "test", "supersecretpassword").await;

    let mut request = post_json("/api/results/submit", submission());
    request.headers_mut().insert(
        header::AUTHORIZATION,
        basic("test", "supersecretpassword").parse().unwrap(),
    );
    let (status, body) = send(app(&store), request).await;
    assert_eq!(status, StatusCode::OK);
    let result_id = body["result_id"].as_i64().unwrap();
    let specs_id = body["specs_id"].as_i64().unwrap();

    let (status, body) = send(app(&store), get(&format!("/api/results/user/{}", user_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], result_id);
    assert_eq!(body[0]["scores"][0]["time"], "1.5s");
    assert_eq!(body[0]["scores"][1]["time"], "250ms");

    let (status, body) = send(app(&store), get(&format!("/api/specs/result/{}", result_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], specs_id);
    assert_eq!(body[0]["specs"]["vendor"], "GenuineIntel");
    assert_eq!(body[0]["specs"]["threads"], "8");
}

#[tokio::test]
async fn result_update_replaces_scores() {
    let store = Arc::new(MemoryStore::new());
    let mut request = post_json("/api/results/submit", submission());
    let user_id = register(&store, "test", "pw").await;
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, basic("test", "pw").parse().unwrap());
    let (_, body) = send(app(&store), request).await;
    let result_id = body["result_id"].as_i64().unwrap();

    let (status, _) = send(
        app(&store),
        post_json(
            &format!("/api/results/update/{}", result_id),
            json!({"user_id": user_id, "scores": [{"name": "Total", "time": "2s", "score": 1.0}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app(&store), get(&format!("/api/results/{}", result_id))).await;
    assert_eq!(body["scores"].as_array().unwrap().len(), 1);
    assert_eq!(body["scores"][0]["time"], "2s");

    let request = Request::post(format!("/api/results/delete/{}", result_id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&store), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.rows::<BenchmarkResult>().is_empty());
}

#[tokio::test]
async fn specs_add_update_delete() {
    let store = Arc::new(MemoryStore::new());

    let (status, body) = send(app(&store), post_json("/api/specs/add/result/6", json!({"specs": {}}))).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();

    let (status, _) = send(
        app(&store),
        post_json(
            &format!("/api/specs/update/{}", id),
            json!({"result_id": 6, "specs": {"vendor": "GenuineIntel"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app(&store), get(&format!("/api/specs/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result_id"], 6);
    assert_eq!(body["specs"]["vendor"], "GenuineIntel");

    let request = Request::post(format!("/api/specs/delete/{}", id))
        .body(Body::empty())
        .unwrap();
    send(app(&store), request).await;

    let (status, _) = send(app(&store), get(&format!("/api/specs/{}", id))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = send(app(&store), get("/api/specs")).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn store_failure_maps_to_500() {
    let store = Arc::new(MemoryStore::new());
    store.fail_all();

    let (status, body) = send(app(&store), get("/api/users")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "an internal error occurred");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let store = Arc::new(MemoryStore::new());
    let request = Request::get("/api/results")
        .header(header::ORIGIN, "http://example.org")
        .body(Body::empty())
        .unwrap();
    let response = app(&store).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
