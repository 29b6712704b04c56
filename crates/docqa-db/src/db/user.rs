use async_trait::async_trait;
use docqa_core::models::{Role, User};
use docqa_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};

use crate::store_traits::CredentialStore;

/// Users table row. The role is stored as its canonical spelling.
#[derive(Debug, Clone, FromRow)]
struct UserRow {
    username: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|e| {
            AppError::Internal(format!("Stored user '{}' has {}", row.username, e))
        })?;
        Ok(User {
            username: row.username,
            password_hash: row.password_hash,
            role,
        })
    }
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    #[tracing::instrument(skip(self, user), fields(db.table = "users", db.operation = "insert", username = %user.username))]
    async fn insert_user(&self, user: User) -> Result<(), AppError> {
        let inserted = sqlx::query_scalar::<Postgres, String>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            RETURNING username
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to insert user");
            AppError::Database(e)
        })?;

        if inserted.is_none() {
            return Err(AppError::Duplicate(
                "Username already registered".to_string(),
            ));
        }

        tracing::info!(username = %user.username, role = %user.role, "User registered");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn find_user(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<Postgres, UserRow>(
            r#"
            SELECT username, password_hash, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to get user by username");
            AppError::Database(e)
        })?;

        row.map(User::try_from).transpose()
    }
}
