//! Users API trait

use async_trait::async_trait;

use crate::client::models::UserRead;
use crate::error::Result;

#[async_trait]
pub trait UsersApi: Send + Sync {
    /// The user the access token belongs to.
    ///
    /// Fails with `ApiError::Unauthorized` for anonymous sessions.
    async fn get_authenticated_user(&self) -> Result<UserRead>;
}
