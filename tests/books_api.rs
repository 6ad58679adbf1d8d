//! End-to-end tests for the books HTTP surface, run against the full
//! router (middleware included) with an in-memory database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use biblio_app::modules::books::models::{BookType, NewBook};
use biblio_app::modules::books::store::BookStore;
use biblio_db::{Database, DatabaseConfig};
use biblio_kernel::settings::Settings;

async fn test_app() -> (Router, BookStore) {
    let settings = Settings::default();
    let db = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();

    let registry = biblio_app::build_registry();
    db.apply_migrations(&registry.collect_migrations())
        .await
        .unwrap();

    let router = biblio_http::build_router(&registry, &settings, &db).unwrap();
    (router, BookStore::new(&db))
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_empty(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn test_book() -> NewBook {
    NewBook {
        name: "Test Book".to_string(),
        author: "Test Author".to_string(),
        year_published: 2021,
        book_type: BookType::FiveDays,
    }
}

fn valid_payload() -> Value {
    json!({
        "name": "Test Book",
        "author": "Test Author",
        "year_published": 2021,
        "book_type": "5days"
    })
}

#[tokio::test]
async fn create_book() {
    let (app, _) = test_app().await;

    let response = post_json(&app, "/books/create", valid_payload()).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/books/"
    );
}

#[tokio::test]
async fn create_book_persists_record() {
    let (app, store) = test_app().await;

    let response = post_json(&app, "/books/create", valid_payload()).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let stored = store.find_by_name("Test Book").await.unwrap().unwrap();
    assert_eq!(stored.author, "Test Author");
    assert_eq!(stored.year_published, 2021);
    assert_eq!(stored.book_type, "5days");
}

#[tokio::test]
async fn create_book_empty_name() {
    let (app, _) = test_app().await;

    let mut payload = valid_payload();
    payload["name"] = json!("");
    let response = post_json(&app, "/books/create", payload).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("Error creating book"));
}

#[tokio::test]
async fn create_book_invalid_year() {
    let (app, _) = test_app().await;

    let mut payload = valid_payload();
    payload["year_published"] = json!("invalid_year");
    let response = post_json(&app, "/books/create", payload).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("Error creating book"));
}

#[tokio::test]
async fn create_book_missing_author() {
    let (app, _) = test_app().await;

    let response = post_json(
        &app,
        "/books/create",
        json!({
            "name": "Test Book",
            "year_published": 2021,
            "book_type": "5days"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("Error creating book"));
}

#[tokio::test]
async fn create_book_markup_name() {
    let (app, _) = test_app().await;

    let mut payload = valid_payload();
    payload["name"] = json!("<script>alert(1)</script>");
    let response = post_json(&app, "/books/create", payload).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("Error creating book"));
}

#[tokio::test]
async fn create_book_sql_metacharacters() {
    let (app, _) = test_app().await;

    let mut payload = valid_payload();
    payload["name"] = json!("Test'; DROP TABLE books; --");
    let response = post_json(&app, "/books/create", payload).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("Error creating book"));
}

#[tokio::test]
async fn edit_book_not_found() {
    let (app, _) = test_app().await;

    let response = post_json(
        &app,
        "/books/999/edit",
        json!({
            "name": "Updated Book",
            "author": "Updated Author",
            "year_published": 2022,
            "book_type": "10days"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Book not found"));
}

#[tokio::test]
async fn edit_book_replaces_fields() {
    let (app, store) = test_app().await;
    let book = store.insert(&test_book()).await.unwrap();

    let response = post_json(
        &app,
        &format!("/books/{}/edit", book.id),
        json!({
            "name": "Updated Book",
            "author": "Updated Author",
            "year_published": 2022,
            "book_type": "10days"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let updated = store.get(book.id).await.unwrap().unwrap();
    assert_eq!(updated.name, "Updated Book");
    assert_eq!(updated.author, "Updated Author");
    assert_eq!(updated.year_published, 2022);
    assert_eq!(updated.book_type, "10days");
}

#[tokio::test]
async fn edit_book_invalid_fields() {
    let (app, store) = test_app().await;
    let book = store.insert(&test_book()).await.unwrap();

    let mut payload = valid_payload();
    payload["name"] = json!("");
    let response = post_json(&app, &format!("/books/{}/edit", book.id), payload).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("Error updating book"));
}

#[tokio::test]
async fn list_books() {
    let (app, _) = test_app().await;

    let response = get(&app, "/books/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Books page accessed"));
}

#[tokio::test]
async fn list_books_json() {
    let (app, _) = test_app().await;

    let response = get(&app, "/books/json").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("books"));
}

#[tokio::test]
async fn list_books_json_counts_records() {
    let (app, store) = test_app().await;
    store.insert(&test_book()).await.unwrap();
    let mut second = test_book();
    second.name = "Second Book".to_string();
    store.insert(&second).await.unwrap();

    let response = get(&app, "/books/json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["books"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn get_book_for_edit() {
    let (app, store) = test_app().await;
    let book = store.insert(&test_book()).await.unwrap();

    let response = get(&app, &format!("/books/{}/edit-data", book.id)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Test Book"));
}

#[tokio::test]
async fn get_book_for_edit_not_found() {
    let (app, _) = test_app().await;

    let response = get(&app, "/books/999/edit-data").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Book not found"));
}

#[tokio::test]
async fn delete_book() {
    let (app, store) = test_app().await;
    let book = store.insert(&test_book()).await.unwrap();

    let response = post_empty(&app, &format!("/books/{}/delete", book.id)).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    // Every lookup on the removed record now misses.
    let response = get(&app, &format!("/books/{}/edit-data", book.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/books/details/Test%20Book").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_book_not_found() {
    let (app, _) = test_app().await;

    let response = post_empty(&app, "/books/999/delete").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Book not found"));
}

#[tokio::test]
async fn get_book_details() {
    let (app, store) = test_app().await;
    store.insert(&test_book()).await.unwrap();

    let response = get(&app, "/books/details/Test%20Book").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Test Book"));
}

#[tokio::test]
async fn get_book_details_not_found() {
    let (app, _) = test_app().await;

    let response = get(&app, "/books/details/Nonexistent%20Book").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Book not found"));
}

#[tokio::test]
async fn created_book_shows_up_in_json_listing() {
    let (app, _) = test_app().await;

    let response = post_json(&app, "/books/create", valid_payload()).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = get(&app, "/books/json").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Test Book"));
}

#[tokio::test]
async fn health_check() {
    let (app, _) = test_app().await;

    let response = get(&app, "/healthz").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}
