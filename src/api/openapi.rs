//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, libraries, roles, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Relationship App API",
        version = "0.1.0",
        description = "Library catalog REST API: authors, books, libraries and librarians"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        // Role pages
        roles::admin_view,
        roles::librarian_view,
        roles::member_view,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::create_author,
        authors::books_by_author,
        // Libraries
        libraries::library_detail,
        libraries::library_books,
        libraries::library_librarian,
        libraries::create_library,
        libraries::add_book,
        libraries::assign_librarian,
        // Users
        users::list_users,
        users::update_role,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::user::RegisterRequest,
            crate::models::user::User,
            crate::models::user::UserInfo,
            crate::models::profile::Role,
            crate::models::profile::UpdateRole,
            crate::models::permission::Permission,
            roles::RolePage,
            // Catalog
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::book::Book,
            crate::models::book::BookWithAuthor,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::library::Library,
            crate::models::library::Librarian,
            crate::models::library::LibraryDetail,
            crate::models::library::CreateLibrary,
            crate::models::library::AddLibraryBook,
            crate::models::library::AssignLibrarian,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and logout"),
        (name = "roles", description = "Role-gated pages"),
        (name = "books", description = "Book catalog"),
        (name = "authors", description = "Authors and their books"),
        (name = "libraries", description = "Libraries and librarians"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_security() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/books"));
        assert!(doc.paths.paths.contains_key("/library/{library_name}"));
        assert!(doc.paths.paths.contains_key("/auth/logout"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
