use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::like::Like;
use crate::domain::notification::NotificationDraft;

#[async_trait]
pub(crate) trait LikeRepository: Send + Sync {
    /// `None` when the pair was already liked. The like and its notification
    /// are stored together or not at all.
    async fn insert_like(
        &self,
        user_id: i64,
        post_id: i64,
        notify: Option<NotificationDraft>,
    ) -> Result<Option<Like>, DomainError>;
    async fn delete_like(&self, user_id: i64, post_id: i64) -> Result<bool, DomainError>;
}
