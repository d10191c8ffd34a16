//! Catalog service: authors, books and libraries

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor},
        book::{Book, BookWithAuthor, CreateBook, UpdateBook},
        library::{CreateLibrary, Librarian, Library, LibraryDetail},
    },
    repository::Repository,
};

use super::queries::{related, QueryService};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    queries: QueryService,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self {
            queries: QueryService::new(repository.clone()),
            repository,
        }
    }

    /// List all books
    pub async fn list_books(&self) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.books.list_all().await
    }

    /// Books of one author; an unknown author has no books
    pub async fn list_author_books(&self, author_id: i32) -> AppResult<Vec<BookWithAuthor>> {
        let author = self.repository.authors.find_by_id(author_id).await?;
        let books = related(author, |author| self.books_of(author)).await?;
        Ok(books.unwrap_or_default())
    }

    async fn books_of(&self, author: Author) -> AppResult<Vec<BookWithAuthor>> {
        let books = self.queries.books_by_author_id(author.id).await?;
        Ok(books
            .into_iter()
            .map(|book| BookWithAuthor::new(book, &author.name))
            .collect())
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book; the author must exist
    pub async fn create_book(&self, data: &CreateBook) -> AppResult<Book> {
        self.ensure_author(data.author_id).await?;
        let book = self.repository.books.create(data).await?;
        tracing::info!("Added book {} ({})", book.id, book.title);
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        if data.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }
        if let Some(author_id) = data.author_id {
            self.ensure_author(author_id).await?;
        }
        let book = self.repository.books.update(id, data).await?;
        tracing::info!("Changed book {}", book.id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    async fn ensure_author(&self, author_id: i32) -> AppResult<()> {
        if self.repository.authors.exists(author_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Author with id {} not found", author_id)))
        }
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn create_author(&self, data: &CreateAuthor) -> AppResult<Author> {
        self.repository.authors.create(data).await
    }

    pub async fn create_library(&self, data: &CreateLibrary) -> AppResult<Library> {
        self.repository.libraries.create(data).await
    }

    /// Library detail by name: books and librarian
    pub async fn library_detail(&self, name: &str) -> AppResult<LibraryDetail> {
        let library = self
            .repository
            .libraries
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library '{}' not found", name)))?;

        let books = self.repository.libraries.books_with_author(library.id).await?;
        let librarian = self.repository.libraries.librarian(library.id).await?;

        Ok(LibraryDetail {
            id: library.id,
            name: library.name,
            books,
            librarian,
        })
    }

    /// Attach an existing book to a library
    pub async fn add_library_book(&self, library_id: i32, book_id: i32) -> AppResult<Vec<Book>> {
        self.repository.libraries.get_by_id(library_id).await?;
        self.repository.books.get_by_id(book_id).await?;

        if !self.repository.libraries.add_book(library_id, book_id).await? {
            tracing::debug!("Book {} already in library {}", book_id, library_id);
        }
        self.repository.libraries.books(library_id).await
    }

    /// Create or rename the librarian of a library
    pub async fn assign_librarian(&self, library_id: i32, name: &str) -> AppResult<Librarian> {
        self.repository.libraries.get_by_id(library_id).await?;
        self.repository.libraries.assign_librarian(library_id, name).await
    }
}
