//! HTTP handlers for the books module.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bookshelf_http::Payload;

use super::error::BookError;
use super::models::{AddComment, BookDetail, BookSummary, CreateBook, CreatedBook};
use super::service::BookService;

/// Routes relative to the module mount point (`/api/books`).
pub fn router(service: BookService) -> Router {
    Router::new()
        .route(
            "/",
            get(list_books).post(create_book).delete(delete_all_books),
        )
        .route("/{id}", get(get_book).post(add_comment).delete(delete_book))
        .with_state(service)
}

async fn list_books(
    State(service): State<BookService>,
) -> Result<Json<Vec<BookSummary>>, BookError> {
    service.list_books().await.map(Json)
}

async fn create_book(
    State(service): State<BookService>,
    Payload(body): Payload<CreateBook>,
) -> Result<Json<CreatedBook>, BookError> {
    service.create_book(body).await.map(Json)
}

async fn delete_all_books(
    State(service): State<BookService>,
) -> Result<Json<&'static str>, BookError> {
    service.delete_all_books().await?;
    Ok(Json("complete delete successful"))
}

async fn get_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<BookDetail>, BookError> {
    service.get_book(&id).await.map(Json)
}

async fn add_comment(
    State(service): State<BookService>,
    Path(id): Path<String>,
    Payload(body): Payload<AddComment>,
) -> Result<Json<BookDetail>, BookError> {
    service.add_comment(&id, body).await.map(Json)
}

async fn delete_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<&'static str>, BookError> {
    service.delete_book(&id).await?;
    Ok(Json("delete successful"))
}
