//! Custom user model, creation rules and JWT claims

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{permission::Permission, profile::Role};
use crate::error::AppError;

/// Letters, digits and `@ . + - _`
pub static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// Directory prefix for stored profile photos
pub const PROFILE_PHOTO_DIR: &str = "profile_photos/";

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Hashed password (argon2); `None` means no usable password
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Age in full years on the given day
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        let dob = self.date_of_birth?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        Some(age)
    }

    pub fn age(&self) -> Option<i32> {
        self.age_on(Utc::now().date_naive())
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}

/// Lowercase the domain part of an email address
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Input to the user manager
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

impl NewUser {
    /// Apply regular-user defaults; email and username are mandatory
    pub fn into_regular(mut self) -> Result<Self, AppError> {
        if self.email.trim().is_empty() {
            return Err(AppError::Validation("The Email field must be set".to_string()));
        }
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("The Username field must be set".to_string()));
        }

        self.email = normalize_email(&self.email);
        self.is_staff.get_or_insert(false);
        self.is_superuser.get_or_insert(false);
        self.is_active.get_or_insert(true);
        Ok(self)
    }

    /// Apply superuser defaults; explicit `false` flags are rejected
    pub fn into_superuser(mut self) -> Result<Self, AppError> {
        let is_staff = *self.is_staff.get_or_insert(true);
        let is_superuser = *self.is_superuser.get_or_insert(true);
        self.is_active.get_or_insert(true);

        if !is_staff {
            return Err(AppError::Validation("Superuser must have is_staff=True.".to_string()));
        }
        if !is_superuser {
            return Err(AppError::Validation("Superuser must have is_superuser=True.".to_string()));
        }

        self.into_regular()
    }

    /// Role given to the profile created alongside this user
    pub fn initial_role(&self) -> Role {
        if self.is_superuser == Some(true) {
            Role::Admin
        } else {
            Role::Member
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        regex(path = *USERNAME_RE, message = "Username may contain only letters, digits and @/./+/-/_")
    )]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "The two password fields didn't match"))]
    pub password_confirm: String,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// File name under `profile_photos/`
    #[validate(length(min = 1, max = 100), custom(function = "validate_photo_name"))]
    pub profile_photo: Option<String>,
}

/// A bare file name: no directory parts, no `..`
fn validate_photo_name(name: &str) -> Result<(), ValidationError> {
    if name.contains(['/', '\\']) || name == ".." || name == "." {
        let mut error = ValidationError::new("profile_photo");
        error.message = Some("Profile photo must be a plain file name".into());
        return Err(error);
    }
    Ok(())
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        NewUser {
            username: req.username,
            email: req.email,
            password: Some(req.password),
            first_name: req.first_name,
            last_name: req.last_name,
            date_of_birth: req.date_of_birth,
            profile_photo: req
                .profile_photo
                .map(|name| format!("{}{}", PROFILE_PHOTO_DIR, name)),
            ..Default::default()
        }
    }
}

/// Public view of a user with role and effective permissions
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<i32>,
    pub profile_photo: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub date_joined: DateTime<Utc>,
}

impl UserInfo {
    pub fn new(user: User, role: Role) -> Self {
        let permissions = effective_permissions(role, user.is_superuser);
        Self {
            age: user.age(),
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_of_birth: user.date_of_birth,
            profile_photo: user.profile_photo,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            role,
            permissions,
            date_joined: user.date_joined,
        }
    }
}

/// Superusers hold every permission, everyone else what their role grants
pub fn effective_permissions(role: Role, is_superuser: bool) -> Vec<Permission> {
    if is_superuser {
        Permission::ALL.to_vec()
    } else {
        role.permissions().to_vec()
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub is_superuser: bool,
    pub permissions: Vec<Permission>,
    /// Token id, used for revocation on logout
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user: &User, role: Role, expiration_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            role,
            is_superuser: user.is_superuser,
            permissions: effective_permissions(role, user.is_superuser),
            jti: uuid::Uuid::new_v4().to_string(),
            exp: now + (expiration_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Swap in the current profile role and the permissions it grants
    pub fn with_role(mut self, role: Role) -> Self {
        self.permissions = effective_permissions(role, self.is_superuser);
        self.role = role;
        self
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Seconds until the token expires (at least 1)
    pub fn remaining_seconds(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(1) as u64
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.is_superuser || self.permissions.contains(&permission)
    }

    pub fn require_permission(&self, permission: Permission) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Permission '{}' required",
                permission.codename()
            )))
        }
    }

    /// Require an exact profile role
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Authorization(format!("{} role required", role)))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require_role(Role::Admin)
    }
}
