//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor},
        book::Book,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "All authors", body = Vec<Author>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(authors))
}

/// Create an author (admin only)
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_admin()?;
    data.validate()?;

    let author = state.services.catalog.create_author(&data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Books written by the named author
#[utoipa::path(
    get,
    path = "/authors/{author_name}/books",
    tag = "authors",
    params(("author_name" = String, Path, description = "Exact author name")),
    responses(
        (status = 200, description = "Books by the author", body = Vec<Book>),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Several authors share the name")
    )
)]
pub async fn books_by_author(
    State(state): State<AppState>,
    Path(author_name): Path<String>,
) -> AppResult<Json<Vec<Book>>> {
    state
        .services
        .queries
        .books_by_author(&author_name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Author '{}' not found", author_name)))
}
