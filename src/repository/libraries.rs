//! Libraries and librarians repository

use sqlx::{Pool, Postgres};

use super::single_by_name;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookWithAuthor},
        library::{CreateLibrary, Librarian, Library},
    },
};

#[derive(Clone)]
pub struct LibrariesRepository {
    pool: Pool<Postgres>,
}

impl LibrariesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Library>> {
        let row = sqlx::query_as::<_, Library>("SELECT id, name FROM libraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Get library by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Library> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library with id {} not found", id)))
    }

    /// Find library by exact name
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Library>> {
        let rows = sqlx::query_as::<_, Library>(
            "SELECT id, name FROM libraries WHERE name = $1 ORDER BY id LIMIT 2",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        single_by_name(rows, "library", name)
    }

    /// Create library
    pub async fn create(&self, data: &CreateLibrary) -> AppResult<Library> {
        let row = sqlx::query_as::<_, Library>(
            "INSERT INTO libraries (name) VALUES ($1) RETURNING id, name",
        )
        .bind(data.name.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Books held by a library
    pub async fn books(&self, library_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.author_id
            FROM books b
            JOIN library_books lb ON lb.book_id = b.id
            WHERE lb.library_id = $1
            ORDER BY b.id
            "#,
        )
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Books held by a library, with author names
    pub async fn books_with_author(&self, library_id: i32) -> AppResult<Vec<BookWithAuthor>> {
        let rows = sqlx::query_as::<_, BookWithAuthor>(
            r#"
            SELECT b.id, b.title, b.author_id, a.name AS author_name
            FROM books b
            JOIN library_books lb ON lb.book_id = b.id
            JOIN authors a ON a.id = b.author_id
            WHERE lb.library_id = $1
            ORDER BY b.title, b.id
            "#,
        )
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Link a book to a library; linking twice is a no-op
    pub async fn add_book(&self, library_id: i32, book_id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO library_books (library_id, book_id)
            VALUES ($1, $2)
            ON CONFLICT (library_id, book_id) DO NOTHING
            "#,
        )
        .bind(library_id)
        .bind(book_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Librarian of a library, if one is assigned
    pub async fn librarian(&self, library_id: i32) -> AppResult<Option<Librarian>> {
        let row = sqlx::query_as::<_, Librarian>(
            "SELECT id, name, library_id FROM librarians WHERE library_id = $1",
        )
        .bind(library_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Create the library's librarian, or rename the existing one
    pub async fn assign_librarian(&self, library_id: i32, name: &str) -> AppResult<Librarian> {
        let row = sqlx::query_as::<_, Librarian>(
            r#"
            INSERT INTO librarians (name, library_id)
            VALUES ($1, $2)
            ON CONFLICT (library_id) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, library_id
            "#,
        )
        .bind(name.trim())
        .bind(library_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
