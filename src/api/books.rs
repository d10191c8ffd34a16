//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookFilter, BookWithAuthor, CreateBook, UpdateBook},
        permission::Permission,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List all books, optionally only those of one author
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookFilter),
    responses(
        (status = 200, description = "Books with their author", body = Vec<BookWithAuthor>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(filter): Query<BookFilter>,
) -> AppResult<Json<Vec<BookWithAuthor>>> {
    let books = match filter.author_id {
        Some(author_id) => state.services.catalog.list_author_books(author_id).await?,
        None => state.services.catalog.list_books().await?,
    };
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 403, description = "can_add_book required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_permission(Permission::CanAddBook)?;
    data.validate()?;

    let book = state.services.catalog.create_book(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Edit a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "can_change_book required"),
        (status = 404, description = "Book or author not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_permission(Permission::CanChangeBook)?;
    data.validate()?;

    let book = state.services.catalog.update_book(id, &data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "can_delete_book required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_permission(Permission::CanDeleteBook)?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
