use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::notification::NotificationDraft;
use crate::domain::pagination::{Page, Pagination};
use crate::domain::user::{FollowCounts, User};

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredentials>, DomainError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Returns `true` only when a new edge was stored. `notify` is written in
    /// the same transaction and only for a new edge.
    async fn add_follow(
        &self,
        follower_id: i64,
        followee_id: i64,
        notify: Option<NotificationDraft>,
    ) -> Result<bool, DomainError>;
    /// Returns `true` only when an existing edge was removed.
    async fn remove_follow(&self, follower_id: i64, followee_id: i64) -> Result<bool, DomainError>;

    async fn list_following(&self, user_id: i64, pagination: Pagination) -> Result<Page<User>, DomainError>;
    async fn list_followers(&self, user_id: i64, pagination: Pagination) -> Result<Page<User>, DomainError>;
    async fn follow_counts(&self, user_id: i64) -> Result<FollowCounts, DomainError>;
}
