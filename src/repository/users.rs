//! Users and profiles repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        profile::{Role, UserProfile},
        user::{NewUser, User},
    },
};

const USER_COLUMNS: &str = "id, username, email, password, first_name, last_name, date_of_birth, \
     profile_photo, is_staff, is_superuser, is_active, date_joined, last_login";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by username (authentication lookup)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// List users, newest first
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY date_joined DESC, id DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Insert a user and its profile in one transaction.
    /// `data` must already carry the manager defaults.
    pub async fn create(
        &self,
        data: &NewUser,
        password_hash: Option<String>,
        role: Role,
    ) -> AppResult<(User, UserProfile)> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password, first_name, last_name, date_of_birth,
                               profile_photo, is_staff, is_superuser, is_active, date_joined)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&data.username)
        .bind(&data.email)
        .bind(password_hash)
        .bind(data.first_name.as_deref().unwrap_or(""))
        .bind(data.last_name.as_deref().unwrap_or(""))
        .bind(data.date_of_birth)
        .bind(&data.profile_photo)
        .bind(data.is_staff.unwrap_or(false))
        .bind(data.is_superuser.unwrap_or(false))
        .bind(data.is_active.unwrap_or(true))
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("A user with that username already exists".to_string())
            }
            other => AppError::Database(other),
        })?;

        let profile = sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (user_id, role) VALUES ($1, $2) RETURNING id, user_id, role",
        )
        .bind(user.id)
        .bind(role)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((user, profile))
    }

    /// Get a user's profile, if any
    pub async fn get_profile(&self, user_id: i32) -> AppResult<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, user_id, role FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    /// Set a user's role, creating the profile if it is missing
    pub async fn set_role(&self, user_id: i32, role: Role) -> AppResult<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role
            RETURNING id, user_id, role
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    /// Record a successful login
    pub async fn touch_last_login(&self, user_id: i32) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
