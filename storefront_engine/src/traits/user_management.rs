use thiserror::Error;

use crate::db_types::{Role, User};

/// The `UserManagement` trait defines behaviour for managing user records and authorization.
///
/// User records are created lazily: the first sign-in upserts a record with the `regular` role.
/// An upsert of an existing user must never clobber the stored role.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError>;

    /// Creates the user record if it does not exist (with the `regular` role), or refreshes the
    /// existing record. Idempotent, and role-preserving on existing records.
    async fn upsert_user(&self, email: &str) -> Result<User, AuthApiError>;

    async fn fetch_all_users(&self) -> Result<Vec<User>, AuthApiError>;

    /// Fetches the role for the given email. An absent user record is data (`None`), not an error;
    /// it is the *authorization* path that turns absence into a failure.
    async fn fetch_role_for_email(&self, email: &str) -> Result<Option<Role>, AuthApiError>;

    /// Sets the role via upsert-by-email. Assigning a role the user already holds is a no-op
    /// success, so promotions are safe to retry.
    async fn set_role_for_email(&self, email: &str, role: Role) -> Result<User, AuthApiError>;

    /// Checks that the user holds at least the given role.
    ///
    /// A caller without any user record fails with [`AuthApiError::UnknownPrincipal`]; a known
    /// caller without the role fails with [`AuthApiError::InsufficientRole`]. The two cases are
    /// never conflated.
    async fn check_email_has_role(&self, email: &str, role: Role) -> Result<(), AuthApiError> {
        match self.fetch_role_for_email(email).await? {
            None => Err(AuthApiError::UnknownPrincipal(email.to_string())),
            Some(held) if held >= role => Ok(()),
            Some(held) => Err(AuthApiError::InsufficientRole { email: email.to_string(), held, required: role }),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("No user record exists for {0}")]
    UnknownPrincipal(String),
    #[error("{email} holds the '{held}' role, but '{required}' is required")]
    InsufficientRole { email: String, held: Role, required: Role },
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}
