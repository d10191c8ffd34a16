//! Role-gated pages

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::profile::Role, models::user::UserClaims};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct RolePage {
    pub role: Role,
    pub username: String,
    pub message: String,
}

fn role_page(claims: &UserClaims, role: Role) -> AppResult<Json<RolePage>> {
    claims.require_role(role)?;
    Ok(Json(RolePage {
        role,
        username: claims.sub.clone(),
        message: format!("Welcome to the {} page, {}", role, claims.sub),
    }))
}

/// Page reserved to admins
#[utoipa::path(
    get,
    path = "/admin",
    tag = "roles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin page", body = RolePage),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn admin_view(AuthenticatedUser(claims): AuthenticatedUser) -> AppResult<Json<RolePage>> {
    role_page(&claims, Role::Admin)
}

/// Page reserved to librarians
#[utoipa::path(
    get,
    path = "/librarian",
    tag = "roles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Librarian page", body = RolePage),
        (status = 403, description = "Librarian role required")
    )
)]
pub async fn librarian_view(
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<RolePage>> {
    role_page(&claims, Role::Librarian)
}

/// Page reserved to members
#[utoipa::path(
    get,
    path = "/member",
    tag = "roles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member page", body = RolePage),
        (status = 403, description = "Member role required")
    )
)]
pub async fn member_view(AuthenticatedUser(claims): AuthenticatedUser) -> AppResult<Json<RolePage>> {
    role_page(&claims, Role::Member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn claims(role: Role) -> UserClaims {
        UserClaims {
            sub: "dana".into(),
            user_id: 4,
            role,
            is_superuser: false,
            permissions: role.permissions().to_vec(),
            jti: "jti".into(),
            exp: i64::MAX,
            iat: 0,
        }
    }

    #[test]
    fn test_each_page_admits_only_its_role() {
        for page in [Role::Admin, Role::Librarian, Role::Member] {
            for role in [Role::Admin, Role::Librarian, Role::Member] {
                let result = role_page(&claims(role), page);
                if role == page {
                    let Json(body) = result.unwrap();
                    assert_eq!(body.role, page);
                    assert_eq!(body.username, "dana");
                } else {
                    assert!(matches!(result, Err(AppError::Authorization(_))));
                }
            }
        }
    }
}
