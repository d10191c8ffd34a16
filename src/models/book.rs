//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book record, owned by exactly one author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// Book joined with its author's name, used by list views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookWithAuthor {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author_name: String,
}

impl BookWithAuthor {
    pub fn new(book: Book, author_name: &str) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author_id: book.author_id,
            author_name: author_name.to_string(),
        }
    }
}

/// Book list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookFilter {
    /// Only books by this author
    pub author_id: Option<i32>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    pub author_id: i32,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    pub author_id: Option<i32>,
}

impl UpdateBook {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_title() {
        let book = Book { id: 1, title: "Dune".into(), author_id: 2 };
        assert_eq!(book.to_string(), "Dune");
    }

    #[test]
    fn test_title_length_is_validated() {
        let too_long = CreateBook { title: "x".repeat(101), author_id: 1 };
        assert!(too_long.validate().is_err());

        let empty = CreateBook { title: String::new(), author_id: 1 };
        assert!(empty.validate().is_err());

        let ok = CreateBook { title: "Emma".into(), author_id: 1 };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_empty_update() {
        let update = UpdateBook { title: None, author_id: None };
        assert!(update.is_empty());
    }
}
