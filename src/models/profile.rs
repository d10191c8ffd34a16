//! User profile and roles

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use super::permission::Permission;

/// Role carried by every user profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    Librarian,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Librarian => "Librarian",
            Role::Member => "Member",
        }
    }

    /// Book permissions granted by this role
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin | Role::Librarian => &Permission::ALL,
            Role::Member => &[],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Librarian" => Ok(Role::Librarian),
            "Member" => Ok(Role::Member),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// Stored as VARCHAR, constrained by a CHECK in the schema
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Profile row linking a user to its role
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub user_id: i32,
    pub role: Role,
}

impl UserProfile {
    /// Display label, e.g. `alice (Librarian)`
    pub fn label(&self, username: &str) -> String {
        format!("{} ({})", username, self.role)
    }
}

/// Update role request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRole {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Librarian, Role::Member] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("member".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_permissions() {
        assert_eq!(Role::Admin.permissions().len(), 3);
        assert!(Role::Librarian.permissions().contains(&Permission::CanDeleteBook));
        assert!(Role::Member.permissions().is_empty());
    }

    #[test]
    fn test_profile_label() {
        let profile = UserProfile { id: 1, user_id: 7, role: Role::Librarian };
        assert_eq!(profile.label("alice"), "alice (Librarian)");
    }

    #[test]
    fn test_default_role_is_member() {
        assert_eq!(Role::default(), Role::Member);
    }
}
