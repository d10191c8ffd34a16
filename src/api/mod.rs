//! API handlers for the relationship REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod libraries;
pub mod openapi;
pub mod roles;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        if state.services.users.is_token_revoked(&claims.jti).await? {
            return Err(AppError::Authentication("Token has been revoked".to_string()));
        }

        // Role changes apply to tokens already issued
        let role = state.services.users.role_of(claims.user_id).await?;
        Ok(AuthenticatedUser(claims.with_role(role)))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))
}

/// API v1 routes, to be nested under `/api/v1`
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Role pages
        .route("/admin", get(roles::admin_view))
        .route("/librarian", get(roles::librarian_view))
        .route("/member", get(roles::member_view))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route("/authors/:author_name/books", get(authors::books_by_author))
        // Libraries
        .route("/library/:library_name", get(libraries::library_detail))
        .route("/libraries", post(libraries::create_library))
        .route(
            "/libraries/:id/books",
            get(libraries::library_books).post(libraries::add_book),
        )
        .route(
            "/libraries/:id/librarian",
            get(libraries::library_librarian).put(libraries::assign_librarian),
        )
        // Users
        .route("/users", get(users::list_users))
        .route("/users/:id/role", put(users::update_role))
        .with_state(state)
}
