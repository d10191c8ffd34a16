//! Library and librarian models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookWithAuthor;

/// Library holding a many-to-many set of books
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Library {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Librarian, attached one-to-one to a library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Librarian {
    pub id: i32,
    pub name: String,
    pub library_id: i32,
}

impl std::fmt::Display for Librarian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Library with its books and librarian (detail view)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryDetail {
    pub id: i32,
    pub name: String,
    pub books: Vec<BookWithAuthor>,
    pub librarian: Option<Librarian>,
}

/// Create library request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLibrary {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Attach book to library request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddLibraryBook {
    pub book_id: i32,
}

/// Assign librarian request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignLibrarian {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}
