//! End-to-end tests for the books API, driven through the module router
//! over an in-memory SQLite database.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use shelf_app::modules::books::{repository::BookRepository, routes, BooksModule};
use shelf_db::Database;
use shelf_kernel::Module;

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:", 1).await.unwrap();
    let module = BooksModule::new();
    db.apply_migrations(module.name(), &module.migrations())
        .await
        .unwrap();

    let repo = BookRepository::new(db.pool().clone());
    Router::new().nest("/books", routes::router(repo))
}

fn test_book() -> Value {
    json!({
        "isbn": "0691161518",
        "amazon_url": "http://a.co/eobPtX2",
        "author": "Matthew Lane",
        "language": "english",
        "pages": 264,
        "publisher": "Princeton University Press",
        "title": "Power-Up: Unlocking the Hidden Mathematics in Video Games",
        "year": 2017
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn create_returns_the_stored_book() {
    let app = test_app().await;
    let payload = test_book();

    let (status, body) = send(&app, "POST", "/books", Some(&payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "book": payload }));
}

#[tokio::test]
async fn create_rejects_each_missing_required_field() {
    let app = test_app().await;
    let required = [
        "isbn",
        "amazon_url",
        "author",
        "language",
        "pages",
        "publisher",
        "title",
        "year",
    ];

    for field in required {
        let mut payload = test_book();
        payload.as_object_mut().unwrap().remove(field);

        let (status, body) = send(&app, "POST", "/books", Some(&payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {field}");
        let details = body["error"]["details"].as_array().unwrap();
        assert_eq!(details, &vec![json!(format!("{field} is required"))]);
    }
}

#[tokio::test]
async fn create_rejects_wrong_field_types() {
    let app = test_app().await;
    let mut payload = test_book();
    payload["pages"] = json!("two hundred");

    let (status, body) = send(&app, "POST", "/books", Some(&payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(
        body["error"]["details"],
        json!(["pages must be an integer"])
    );
}

#[tokio::test]
async fn create_rejects_duplicate_isbn() {
    let app = test_app().await;
    let payload = test_book();

    let (status, body) = send(&app, "POST", "/books", Some(&payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "book": payload }));

    let (status, body) = send(&app, "POST", "/books", Some(&payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn list_returns_all_books() {
    let app = test_app().await;
    let payload = test_book();
    send(&app, "POST", "/books", Some(&payload)).await;

    let (status, body) = send(&app, "GET", "/books", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "books": [payload] }));
}

#[tokio::test]
async fn get_returns_book_by_isbn() {
    let app = test_app().await;
    let payload = test_book();
    send(&app, "POST", "/books", Some(&payload)).await;

    let (status, body) = send(&app, "GET", "/books/0691161518", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "book": payload }));
}

#[tokio::test]
async fn get_unknown_isbn_is_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/books/0000000000", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn update_changes_only_the_supplied_field() {
    let app = test_app().await;
    let payload = test_book();
    send(&app, "POST", "/books", Some(&payload)).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/books/0691161518",
        Some(&json!({"language": "spanish"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let mut expected = payload;
    expected["language"] = json!("spanish");
    assert_eq!(body, json!({ "book": expected }));
}

#[tokio::test]
async fn update_drops_fields_outside_the_schema() {
    let app = test_app().await;
    let payload = test_book();
    send(&app, "POST", "/books", Some(&payload)).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/books/0691161518",
        Some(&json!({
            "moneyTeam": "FloydMaywhether",
            "favShow": "IDK, hard to pick"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"].get("moneyTeam"), None);
    assert_eq!(body["book"].get("favShow"), None);
    assert_eq!(body, json!({ "book": payload }));
}

#[tokio::test]
async fn update_with_empty_body_leaves_book_unchanged() {
    let app = test_app().await;
    let payload = test_book();
    send(&app, "POST", "/books", Some(&payload)).await;

    let (status, body) = send(&app, "PUT", "/books/0691161518", Some(&json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "book": payload }));
}

#[tokio::test]
async fn update_rejects_invalid_supplied_fields() {
    let app = test_app().await;
    send(&app, "POST", "/books", Some(&test_book())).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/books/0691161518",
        Some(&json!({"pages": -3})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"],
        json!(["pages must be a positive integer"])
    );
}

#[tokio::test]
async fn update_unknown_isbn_is_not_found() {
    let app = test_app().await;

    let (status, _body) = send(
        &app,
        "PUT",
        "/books/0000000000",
        Some(&json!({"language": "spanish"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_the_book() {
    let app = test_app().await;
    send(&app, "POST", "/books", Some(&test_book())).await;

    let (status, body) = send(&app, "DELETE", "/books/0691161518", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Book deleted" }));

    let (status, _body) = send(&app, "GET", "/books/0691161518", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _body) = send(&app, "DELETE", "/books/0691161518", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
