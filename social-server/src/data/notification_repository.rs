use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::notification::Notification;
use crate::domain::pagination::{Page, Pagination};

#[async_trait]
pub(crate) trait NotificationRepository: Send + Sync {
    async fn get_notification(&self, id: i64) -> Result<Option<Notification>, DomainError>;
    async fn list_notifications(
        &self,
        recipient_id: i64,
        unread_only: bool,
        pagination: Pagination,
    ) -> Result<Page<Notification>, DomainError>;

    /// `None` when no notification with this id belongs to `recipient_id`.
    async fn mark_read_owned(
        &self,
        notification_id: i64,
        recipient_id: i64,
    ) -> Result<Option<Notification>, DomainError>;
    async fn mark_all_read(&self, recipient_id: i64) -> Result<u64, DomainError>;
}
