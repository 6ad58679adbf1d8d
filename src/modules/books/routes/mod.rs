//! HTTP handlers for the books module.
//!
//! Error contract: rejected form input surfaces as 500 with an
//! operation-specific message; unknown ids and names surface as 404 with
//! "Book not found". Successful writes redirect (302) to the list page.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

use biblio_http::{error::AppError, redirect_found};

use super::models::BookForm;
use super::store::BookStore;

const LIST_LOCATION: &str = "/books/";

/// POST /books/create
pub async fn create_book(
    State(store): State<BookStore>,
    Json(form): Json<BookForm>,
) -> Result<Response, AppError> {
    let book = form
        .validate()
        .map_err(|details| AppError::validation(details, "Error creating book"))?;

    let created = store.insert(&book).await?;
    tracing::info!(id = created.id, name = %created.name, "book created");

    Ok(redirect_found(LIST_LOCATION))
}

/// GET /books/
pub async fn list_books(State(store): State<BookStore>) -> Result<Html<String>, AppError> {
    let books = store.list().await?;

    let mut rows = String::new();
    for book in &books {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            book.name, book.author, book.year_published, book.book_type
        ));
    }

    // Marker text kept stable; clients and monitors grep for it.
    Ok(Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Book Library</title></head>\n<body>\n\
         <h1>Book Library</h1>\n<p>Books page accessed</p>\n\
         <table>\n<tr><th>Name</th><th>Author</th><th>Year</th><th>Type</th></tr>\n{rows}</table>\n\
         </body>\n</html>\n"
    )))
}

/// GET /books/json
pub async fn list_books_json(
    State(store): State<BookStore>,
) -> Result<Json<serde_json::Value>, AppError> {
    let books = store.list().await?;
    Ok(Json(json!({ "books": books })))
}

/// GET /books/{id}/edit-data
pub async fn get_book_for_edit(
    State(store): State<BookStore>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let book = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(Json(book).into_response())
}

/// POST /books/{id}/edit
pub async fn edit_book(
    State(store): State<BookStore>,
    Path(id): Path<i64>,
    Json(form): Json<BookForm>,
) -> Result<Response, AppError> {
    if store.get(id).await?.is_none() {
        return Err(AppError::not_found("Book not found"));
    }

    let book = form
        .validate()
        .map_err(|details| AppError::validation(details, "Error updating book"))?;

    store.update(id, &book).await?;
    tracing::info!(id, name = %book.name, "book updated");

    Ok(redirect_found(LIST_LOCATION))
}

/// POST /books/{id}/delete
pub async fn delete_book(
    State(store): State<BookStore>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if !store.delete(id).await? {
        return Err(AppError::not_found("Book not found"));
    }

    tracing::info!(id, "book deleted");

    Ok(redirect_found(LIST_LOCATION))
}

/// GET /books/details/{name}
///
/// The path segment arrives percent-decoded; lookup is an exact match on
/// the stored name, first match wins.
pub async fn book_details(
    State(store): State<BookStore>,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    let book = store
        .find_by_name(&name)
        .await?
        .ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{name}</title></head>\n<body>\n\
         <h1>{name}</h1>\n\
         <p>Author: {author}</p>\n<p>Published: {year}</p>\n<p>Loan type: {book_type}</p>\n\
         </body>\n</html>\n",
        name = book.name,
        author = book.author,
        year = book.year_published,
        book_type = book.book_type
    )))
}
