use std::fmt::Debug;

use log::*;

use crate::{
    db_types::User,
    traits::{AuthApiError, UserManagement},
};

/// `UserApi` manages user records: the sign-in upsert and listings.
pub struct UserApi<B> {
    db: B,
}

impl<B> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi")
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates or refreshes the user record for a sign-in. New records start with the regular
    /// role; existing records keep whatever role they hold.
    pub async fn upsert_user(&self, email: &str) -> Result<User, AuthApiError> {
        let user = self.db.upsert_user(email).await?;
        trace!("👤️ Upserted user record for {}", user.email);
        Ok(user)
    }

    pub async fn fetch_user(&self, email: &str) -> Result<Option<User>, AuthApiError> {
        self.db.fetch_user_by_email(email).await
    }

    pub async fn all_users(&self) -> Result<Vec<User>, AuthApiError> {
        self.db.fetch_all_users().await
    }
}
