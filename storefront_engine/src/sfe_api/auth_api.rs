use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Role, User},
    traits::{AuthApiError, UserManagement},
};

/// `AuthApi` answers role questions and performs role elevation.
///
/// [`AuthApi::require_admin`] is the single authorizer for every admin-gated operation; routes
/// never inspect roles themselves.
pub struct AuthApi<B> {
    db: B,
}

impl<B> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi")
    }
}

impl<B> AuthApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Allows the operation to proceed only if the caller holds the admin role.
    ///
    /// A caller with no user record at all fails with [`AuthApiError::UnknownPrincipal`]; a known
    /// caller without the role fails with [`AuthApiError::InsufficientRole`].
    pub async fn require_admin(&self, email: &str) -> Result<(), AuthApiError> {
        self.db.check_email_has_role(email, Role::Admin).await
    }

    /// Answers the plain "is this email an admin?" query. An email with no user record is simply
    /// not an admin; only gated operations distinguish unknown principals.
    pub async fn is_admin(&self, email: &str) -> Result<bool, AuthApiError> {
        Ok(matches!(self.db.fetch_role_for_email(email).await?, Some(Role::Admin)))
    }

    /// Grants the admin role to the target via upsert-by-email. Promoting a user that is already
    /// an admin is a no-op success.
    pub async fn promote_to_admin(&self, email: &str) -> Result<User, AuthApiError> {
        let user = self.db.set_role_for_email(email, Role::Admin).await?;
        info!("🔐️ {} now holds the '{}' role", user.email, user.role);
        Ok(user)
    }
}
