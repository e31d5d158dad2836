//! SQLite operations for user records and roles.
//!
//! Generally clients should never call these methods directly, and prefer the [`UserManagement`]
//! trait methods implemented on [`SqliteDatabase`](crate::SqliteDatabase) instead.

use sqlx::SqliteConnection;

use crate::{
    db_types::{Role, User},
    traits::AuthApiError,
};

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, AuthApiError> {
    let user: Option<User> =
        sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(user)
}

/// Creates the user record if needed, or refreshes the existing one. On conflict only
/// `updated_at` changes; a sign-in never touches the stored role.
pub async fn upsert_user(email: &str, conn: &mut SqliteConnection) -> Result<User, AuthApiError> {
    let user: User = sqlx::query_as(
        r#"
            INSERT INTO users (email) VALUES ($1)
            ON CONFLICT (email) DO UPDATE SET updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(email)
    .fetch_one(conn)
    .await?;
    Ok(user)
}

pub async fn fetch_all_users(conn: &mut SqliteConnection) -> Result<Vec<User>, AuthApiError> {
    let users = sqlx::query_as("SELECT * FROM users ORDER BY email ASC").fetch_all(conn).await?;
    Ok(users)
}

pub async fn fetch_role_for_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Role>, AuthApiError> {
    let role: Option<Role> =
        sqlx::query_scalar("SELECT role FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(role)
}

/// Sets the role via upsert-by-email. Re-assigning a role the user already holds rewrites the same
/// value, so the operation is idempotent.
pub async fn set_role_for_email(
    email: &str,
    role: Role,
    conn: &mut SqliteConnection,
) -> Result<User, AuthApiError> {
    let user: User = sqlx::query_as(
        r#"
            INSERT INTO users (email, role) VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET role = excluded.role, updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(email)
    .bind(role)
    .fetch_one(conn)
    .await?;
    Ok(user)
}
