//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        profile::Role,
        user::{NewUser, User, UserClaims, UserInfo},
    },
    repository::Repository,
    services::redis::RedisService,
};

/// Issued bearer token with the user it belongs to
pub struct Session {
    pub token: String,
    pub expires_in: u64,
    pub user: UserInfo,
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    redis: RedisService,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, redis: RedisService) -> Self {
        Self { repository, config, redis }
    }

    /// Create a regular user with a Member profile
    pub async fn create_user(&self, data: NewUser) -> AppResult<(User, Role)> {
        let data = data.into_regular()?;
        self.insert(data).await
    }

    /// Create a superuser with an Admin profile
    pub async fn create_superuser(&self, data: NewUser) -> AppResult<(User, Role)> {
        let data = data.into_superuser()?;
        self.insert(data).await
    }

    async fn insert(&self, data: NewUser) -> AppResult<(User, Role)> {
        if self.repository.users.username_exists(&data.username).await? {
            return Err(AppError::Conflict(
                "A user with that username already exists".to_string(),
            ));
        }

        let password = match data.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let role = data.initial_role();
        let (user, profile) = self.repository.users.create(&data, password, role).await?;
        tracing::info!("Created user {} with role {}", user.username, profile.role);

        Ok((user, profile.role))
    }

    /// Register a new account and log it in
    pub async fn register(&self, data: NewUser) -> AppResult<Session> {
        let (user, role) = self.create_user(data).await?;
        self.open_session(user, role).await
    }

    /// Check credentials and issue a token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Session> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        check_login(&user, password)?;

        let role = self.role_of(user.id).await?;
        self.open_session(user, role).await
    }

    async fn open_session(&self, user: User, role: Role) -> AppResult<Session> {
        let claims = UserClaims::new(&user, role, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        self.repository.users.touch_last_login(user.id).await?;
        tracing::info!("User {} logged in", user.username);

        Ok(Session {
            token,
            expires_in: self.config.jwt_expiration_hours * 3600,
            user: UserInfo::new(user, role),
        })
    }

    /// Revoke the token behind these claims
    pub async fn logout(&self, claims: &UserClaims) -> AppResult<()> {
        self.redis
            .revoke_token(&claims.jti, claims.remaining_seconds())
            .await?;
        tracing::info!("User {} logged out", claims.sub);
        Ok(())
    }

    pub async fn is_token_revoked(&self, jti: &str) -> AppResult<bool> {
        self.redis.is_token_revoked(jti).await
    }

    /// Profile role; users without a profile count as members
    pub async fn role_of(&self, user_id: i32) -> AppResult<Role> {
        Ok(self
            .repository
            .users
            .get_profile(user_id)
            .await?
            .map(|p| p.role)
            .unwrap_or_default())
    }

    /// Current user with role and permissions
    pub async fn get_info(&self, user_id: i32) -> AppResult<UserInfo> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let role = self.role_of(user_id).await?;
        Ok(UserInfo::new(user, role))
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Change a user's role (admin only)
    pub async fn set_role(&self, user_id: i32, role: Role) -> AppResult<UserInfo> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let profile = self.repository.users.set_role(user_id, role).await?;
        tracing::info!("Role of {} set to {}", user.username, profile.role);
        Ok(UserInfo::new(user, profile.role))
    }
}

/// Password first, then the active flag, so an inactive account is not
/// revealed to someone without its password
pub fn check_login(user: &User, password: &str) -> AppResult<()> {
    if !verify_password(user, password)? {
        tracing::debug!("Rejected password for {}", user.username);
        return Err(AppError::Authentication("Invalid username or password".to_string()));
    }
    if !user.is_active {
        return Err(AppError::Authentication("Account is inactive".to_string()));
    }
    Ok(())
}

/// Verify a password against the stored argon2 hash
pub fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let Some(ref hash) = user.password else {
        return Ok(false);
    };
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
