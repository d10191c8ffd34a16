//! Relation lookups: books by author, books of a library, a library's librarian.
//!
//! Each lookup anchored on a row returns `None` when that row does not exist,
//! and `Some` (possibly empty) otherwise.

use std::future::Future;

use crate::{
    error::AppResult,
    models::{book::Book, library::Librarian},
    repository::Repository,
};

#[derive(Clone)]
pub struct QueryService {
    repository: Repository,
}

/// Run `fetch` on the anchor row, or answer `None` if there is no anchor
pub(crate) async fn related<A, T, F, Fut>(anchor: Option<A>, fetch: F) -> AppResult<Option<T>>
where
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    match anchor {
        Some(anchor) => fetch(anchor).await.map(Some),
        None => Ok(None),
    }
}

impl QueryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books written by the author with this exact name
    pub async fn books_by_author(&self, author_name: &str) -> AppResult<Option<Vec<Book>>> {
        let author = self.repository.authors.find_by_name(author_name).await?;
        if author.is_none() {
            tracing::debug!("No author named {:?}", author_name);
        }
        related(author, |author| self.repository.books.list_by_author(author.id)).await
    }

    /// Books filtered by author id; an unknown id yields an empty list
    pub async fn books_by_author_id(&self, author_id: i32) -> AppResult<Vec<Book>> {
        self.repository.books.list_by_author(author_id).await
    }

    /// All books held by the library with this exact name
    pub async fn library_books(&self, library_name: &str) -> AppResult<Option<Vec<Book>>> {
        let library = self.repository.libraries.find_by_name(library_name).await?;
        if library.is_none() {
            tracing::debug!("No library named {:?}", library_name);
        }
        related(library, |library| self.repository.libraries.books(library.id)).await
    }

    pub async fn library_books_by_id(&self, library_id: i32) -> AppResult<Option<Vec<Book>>> {
        let library = self.repository.libraries.find_by_id(library_id).await?;
        related(library, |library| self.repository.libraries.books(library.id)).await
    }

    /// Librarian of the named library; `None` if the library or its librarian is missing
    pub async fn library_librarian(&self, library_name: &str) -> AppResult<Option<Librarian>> {
        let library = self.repository.libraries.find_by_name(library_name).await?;
        let librarian =
            related(library, |library| self.repository.libraries.librarian(library.id)).await?;
        Ok(librarian.flatten())
    }

    pub async fn library_librarian_by_id(&self, library_id: i32) -> AppResult<Option<Librarian>> {
        let library = self.repository.libraries.find_by_id(library_id).await?;
        let librarian =
            related(library, |library| self.repository.libraries.librarian(library.id)).await?;
        Ok(librarian.flatten())
    }
}
