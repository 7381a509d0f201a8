use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode},
};
use chrono::{FixedOffset, TimeZone};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, prelude::DateTimeWithTimeZone};
use serde_json::json;
use tower::ServiceExt;

use tasklist_server::{
    db::entities::{todo, user},
    routes::API_PREFIX,
    services::todo_service::OwnershipPolicy,
    test_helpers::test_app,
};

fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

fn ts() -> DateTimeWithTimeZone {
    FixedOffset::east_opt(0)
        .expect("offset should be valid")
        .with_ymd_and_hms(2026, 2, 1, 9, 30, 0)
        .single()
        .expect("timestamp should be valid")
}

fn user_row(id: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: Some(format!("{id}@example.com")),
        name: None,
        created_at: ts(),
    }
}

fn todo_row(id: i32, owner_id: &str) -> todo::Model {
    todo::Model {
        id,
        created_at: ts(),
        updated_at: ts(),
        text: "a".to_string(),
        completed: false,
        owner_id: owner_id.to_string(),
    }
}

// No mocked results: a handler that reached storage would answer 500.
fn empty_app() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    test_app(db, OwnershipPolicy::Disclose).expect("build app")
}

fn app_with(db: MockDatabase, ownership: OwnershipPolicy) -> Router {
    test_app(db.into_connection(), ownership).expect("build app")
}

async fn json_response(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("request should succeed");
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("body should be json");
    (status, json)
}

#[tokio::test]
async fn every_todo_route_requires_authorization_header() {
    let requests = [
        ("GET", "/todos", Body::empty()),
        ("POST", "/todos", Body::from(json!({ "text": "a" }).to_string())),
        ("PUT", "/todos/1", Body::from(json!({ "completed": true }).to_string())),
        ("DELETE", "/todos/1", Body::empty()),
        ("GET", "/me", Body::empty()),
    ];

    for (method, path, body) in requests {
        let (status, json) = json_response(
            empty_app(),
            Request::builder()
                .method(method)
                .uri(api_path(path))
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {path}");
        assert_eq!(json["message"], "Missing authorization header");
        assert_eq!(json["status"], 401);
        assert!(json["data"].is_null());
    }
}

#[tokio::test]
async fn malformed_authorization_header_is_rejected_without_lookup() {
    for header in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer two tokens"] {
        let (status, json) = json_response(
            empty_app(),
            Request::builder()
                .uri(api_path("/todos"))
                .header("authorization", header)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "header: {header}");
        assert_eq!(json["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn unknown_user_gets_the_same_message_as_a_malformed_token() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Disclose),
        Request::builder()
            .uri(api_path("/todos"))
            .header("authorization", "Bearer ghost")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Invalid credentials");
}

#[tokio::test]
async fn identity_lookup_failure_is_an_opaque_internal_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset by peer".to_string())]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Disclose),
        Request::builder()
            .uri(api_path("/todos"))
            .header("authorization", "Bearer alice")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Internal server error");
}

#[tokio::test]
async fn identity_is_checked_before_the_path_id() {
    let (status, json) = json_response(
        empty_app(),
        Request::builder()
            .method("DELETE")
            .uri(api_path("/todos/not-a-number"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Missing authorization header");
}

#[tokio::test]
async fn non_numeric_id_is_invalid_input() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user_row("alice")]]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Disclose),
        Request::builder()
            .method("PUT")
            .uri(api_path("/todos/abc"))
            .header("authorization", "Bearer alice")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "completed": true }).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid todo id");
}

#[tokio::test]
async fn id_beyond_key_range_is_not_found() {
    let requests = [
        ("PUT", Body::from(json!({ "completed": true }).to_string())),
        ("DELETE", Body::empty()),
    ];

    for (method, body) in requests {
        // Only the identity lookup is mocked; the item lookup never runs.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_row("alice")]]);

        let (status, json) = json_response(
            app_with(db, OwnershipPolicy::Disclose),
            Request::builder()
                .method(method)
                .uri(api_path("/todos/99999999999"))
                .header("authorization", "Bearer alice")
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(json["message"], "Todo not found");
    }
}

#[tokio::test]
async fn non_boolean_completed_is_invalid_input() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user_row("alice")]]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Disclose),
        Request::builder()
            .method("PUT")
            .uri(api_path("/todos/1"))
            .header("authorization", "Bearer alice")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "completed": "yes" }).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn blank_text_is_invalid_input() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user_row("alice")]]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Disclose),
        Request::builder()
            .method("POST")
            .uri(api_path("/todos"))
            .header("authorization", "Bearer alice")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "text": "   " }).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Text required");
}

#[tokio::test]
async fn update_of_foreign_item_is_forbidden() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user_row("bob")]])
        .append_query_results([[todo_row(7, "alice")]]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Disclose),
        Request::builder()
            .method("PUT")
            .uri(api_path("/todos/7"))
            .header("authorization", "Bearer bob")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "completed": true }).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Not authorized to update this todo");
}

#[tokio::test]
async fn conceal_policy_hides_foreign_items() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user_row("bob")]])
        .append_query_results([[todo_row(7, "alice")]]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Conceal),
        Request::builder()
            .method("DELETE")
            .uri(api_path("/todos/7"))
            .header("authorization", "Bearer bob")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Todo not found");
}

#[tokio::test]
async fn delete_of_missing_item_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user_row("alice")]])
        .append_query_results([Vec::<todo::Model>::new()]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Disclose),
        Request::builder()
            .method("DELETE")
            .uri(api_path("/todos/404"))
            .header("authorization", "Bearer alice")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Todo not found");
}

#[tokio::test]
async fn list_serializes_items_in_camel_case() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user_row("alice")]])
        .append_query_results([[todo_row(2, "alice"), todo_row(1, "alice")]]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Disclose),
        Request::builder()
            .uri(api_path("/todos"))
            .header("authorization", "Bearer alice")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = json["data"].as_array().expect("data should be an array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], 2);
    assert_eq!(items[0]["ownerId"], "alice");
    assert_eq!(items[0]["completed"], false);
    assert!(items[0]["createdAt"].is_string());
    assert!(items[0]["updatedAt"].is_string());
}

#[tokio::test]
async fn me_returns_resolved_identity() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user_row("alice")]]);

    let (status, json) = json_response(
        app_with(db, OwnershipPolicy::Disclose),
        Request::builder()
            .uri(api_path("/me"))
            .header("authorization", "bearer alice")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], "alice");
    assert_eq!(json["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn unknown_route_is_normalized_to_json_error() {
    let (status, json) = json_response(
        empty_app(),
        Request::builder()
            .uri(api_path("/unknown-route"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert!(json["data"].is_null());
}
