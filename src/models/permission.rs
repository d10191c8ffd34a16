//! Book permissions

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Custom permissions attached to the book model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CanAddBook,
    CanChangeBook,
    CanDeleteBook,
}

impl Permission {
    pub const ALL: [Permission; 3] = [
        Permission::CanAddBook,
        Permission::CanChangeBook,
        Permission::CanDeleteBook,
    ];

    pub fn codename(&self) -> &'static str {
        match self {
            Permission::CanAddBook => "can_add_book",
            Permission::CanChangeBook => "can_change_book",
            Permission::CanDeleteBook => "can_delete_book",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Permission::CanAddBook => "Can add book",
            Permission::CanChangeBook => "Can change book",
            Permission::CanDeleteBook => "Can delete book",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.codename())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.codename() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}
