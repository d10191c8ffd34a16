//! Data models for the library catalog

pub mod author;
pub mod book;
pub mod library;
pub mod permission;
pub mod profile;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookWithAuthor};
pub use library::{Librarian, Library, LibraryDetail};
pub use permission::Permission;
pub use profile::{Role, UserProfile};
pub use user::{User, UserClaims};
