//! Books repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookWithAuthor, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List every book with its author name
    pub async fn list_all(&self) -> AppResult<Vec<BookWithAuthor>> {
        let rows = sqlx::query_as::<_, BookWithAuthor>(
            r#"
            SELECT b.id, b.title, b.author_id, a.name AS author_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.title, b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT id, title, author_id FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Books written by an author
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id FROM books WHERE author_id = $1 ORDER BY id",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create book
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author_id)
            VALUES ($1, $2)
            RETURNING id, title, author_id
            "#,
        )
        .bind(data.title.trim())
        .bind(data.author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update book; absent fields keep their value
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author_id = COALESCE($3, author_id)
            WHERE id = $1
            RETURNING id, title, author_id
            "#,
        )
        .bind(id)
        .bind(data.title.as_deref().map(str::trim))
        .bind(data.author_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete book (library links cascade)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
