//! Library endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        library::{AddLibraryBook, AssignLibrarian, CreateLibrary, Librarian, Library, LibraryDetail},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Library detail: books and librarian
#[utoipa::path(
    get,
    path = "/library/{library_name}",
    tag = "libraries",
    params(("library_name" = String, Path, description = "Exact library name")),
    responses(
        (status = 200, description = "Library detail", body = LibraryDetail),
        (status = 404, description = "Library not found")
    )
)]
pub async fn library_detail(
    State(state): State<AppState>,
    Path(library_name): Path<String>,
) -> AppResult<Json<LibraryDetail>> {
    let detail = state.services.catalog.library_detail(&library_name).await?;
    Ok(Json(detail))
}

/// Books held by a library
#[utoipa::path(
    get,
    path = "/libraries/{id}/books",
    tag = "libraries",
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Books in the library", body = Vec<Book>),
        (status = 404, description = "Library not found")
    )
)]
pub async fn library_books(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Book>>> {
    state
        .services
        .queries
        .library_books_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Library with id {} not found", id)))
}

/// Librarian of a library
#[utoipa::path(
    get,
    path = "/libraries/{id}/librarian",
    tag = "libraries",
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "The library's librarian", body = Librarian),
        (status = 404, description = "Library not found or no librarian assigned")
    )
)]
pub async fn library_librarian(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Librarian>> {
    state
        .services
        .queries
        .library_librarian_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No librarian found for library {}", id)))
}

/// Create a library (admin only)
#[utoipa::path(
    post,
    path = "/libraries",
    tag = "libraries",
    security(("bearer_auth" = [])),
    request_body = CreateLibrary,
    responses(
        (status = 201, description = "Library created", body = Library),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_library(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateLibrary>,
) -> AppResult<(StatusCode, Json<Library>)> {
    claims.require_admin()?;
    data.validate()?;

    let library = state.services.catalog.create_library(&data).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

/// Attach a book to a library (admin only)
#[utoipa::path(
    post,
    path = "/libraries/{id}/books",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library ID")),
    request_body = AddLibraryBook,
    responses(
        (status = 200, description = "Books now in the library", body = Vec<Book>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Library or book not found")
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AddLibraryBook>,
) -> AppResult<Json<Vec<Book>>> {
    claims.require_admin()?;

    let books = state.services.catalog.add_library_book(id, data.book_id).await?;
    Ok(Json(books))
}

/// Assign the librarian of a library (admin only)
#[utoipa::path(
    put,
    path = "/libraries/{id}/librarian",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library ID")),
    request_body = AssignLibrarian,
    responses(
        (status = 200, description = "Librarian assigned", body = Librarian),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Library not found")
    )
)]
pub async fn assign_librarian(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AssignLibrarian>,
) -> AppResult<Json<Librarian>> {
    claims.require_admin()?;
    data.validate()?;

    let librarian = state.services.catalog.assign_librarian(id, &data.name).await?;
    Ok(Json(librarian))
}
