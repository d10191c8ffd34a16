//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod libraries;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::{AppError, AppResult};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub libraries: libraries::LibrariesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            libraries: libraries::LibrariesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Collapse a name lookup (fetched with `LIMIT 2`) into at most one row.
/// Several rows sharing the name is reported as a conflict.
pub(crate) fn single_by_name<T>(mut rows: Vec<T>, kind: &str, name: &str) -> AppResult<Option<T>> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        _ => Err(AppError::Conflict(format!(
            "More than one {} named '{}'",
            kind, name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_by_name() {
        assert_eq!(single_by_name::<i32>(vec![], "author", "x").unwrap(), None);
        assert_eq!(single_by_name(vec![7], "author", "x").unwrap(), Some(7));
        assert!(matches!(
            single_by_name(vec![1, 2], "library", "Central"),
            Err(AppError::Conflict(_))
        ));
    }
}
