use tracing::info;

use crate::data::notification_repository::NotificationRepository;
use crate::domain::error::DomainError;
use crate::domain::notification::Notification;
use crate::domain::pagination::{Page, Pagination};

/// Read side of the notification log. Records are only ever created by the
/// other services as side effects.
pub(crate) struct NotificationService<N: NotificationRepository> {
    repo: N,
}

impl<N: NotificationRepository> NotificationService<N> {
    pub(crate) fn new(repo: N) -> Self {
        Self { repo }
    }

    pub(crate) async fn list(
        &self,
        recipient_id: i64,
        unread_only: bool,
        pagination: Pagination,
    ) -> Result<Page<Notification>, DomainError> {
        self.repo
            .list_notifications(recipient_id, unread_only, pagination)
            .await
    }

    /// Strangers get `NotFound`; the actor, who already knows the record
    /// exists, gets `Forbidden`.
    pub(crate) async fn mark_read(
        &self,
        recipient_id: i64,
        notification_id: i64,
    ) -> Result<Notification, DomainError> {
        if let Some(notification) = self
            .repo
            .mark_read_owned(notification_id, recipient_id)
            .await?
        {
            return Ok(notification);
        }

        match self.repo.get_notification(notification_id).await? {
            Some(existing) if existing.actor_id == recipient_id => Err(DomainError::Forbidden),
            _ => Err(DomainError::NotFound(format!(
                "notification id: {notification_id}"
            ))),
        }
    }

    pub(crate) async fn mark_all_read(&self, recipient_id: i64) -> Result<u64, DomainError> {
        let updated = self.repo.mark_all_read(recipient_id).await?;
        info!(recipient_id, updated, "notifications marked read");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationService;
    use crate::data::repositories::memory::InMemoryStore;
    use crate::domain::error::DomainError;
    use crate::domain::notification::{
        Notification, NotificationDraft, TargetKind, VERB_LIKED_POST,
    };
    use crate::domain::pagination::{PageLimits, Pagination};

    fn first_page() -> Pagination {
        PageLimits::default()
            .resolve(None, None)
            .expect("default pagination")
    }

    fn notify(store: &InMemoryStore, recipient_id: i64, actor_id: i64) -> Notification {
        let input = NotificationDraft::for_action(recipient_id, actor_id, VERB_LIKED_POST)
            .expect("distinct users")
            .about(TargetKind::Post, 1);
        store.seed_notification(input)
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filters_unread() {
        let store = InMemoryStore::new();
        let bob = store.add_user("bob");
        let alice = store.add_user("alice");
        let older = notify(&store, bob.id, alice.id);
        let newer = notify(&store, bob.id, alice.id);
        notify(&store, alice.id, bob.id);
        let service = NotificationService::new(store);

        let page = service
            .list(bob.id, false, first_page())
            .await
            .expect("list must succeed");
        let ids: Vec<i64> = page.items.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        service
            .mark_read(bob.id, older.id)
            .await
            .expect("recipient can mark read");
        let unread = service
            .list(bob.id, true, first_page())
            .await
            .expect("list must succeed");
        assert_eq!(unread.total, 1);
        assert_eq!(unread.items[0].id, newer.id);
    }

    #[tokio::test]
    async fn mark_read_is_repeatable_for_recipient() {
        let store = InMemoryStore::new();
        let bob = store.add_user("bob");
        let alice = store.add_user("alice");
        let notification = notify(&store, bob.id, alice.id);
        let service = NotificationService::new(store);

        let first = service
            .mark_read(bob.id, notification.id)
            .await
            .expect("mark must succeed");
        assert!(first.read);
        let again = service
            .mark_read(bob.id, notification.id)
            .await
            .expect("marking twice must succeed");
        assert!(again.read);
    }

    #[tokio::test]
    async fn mark_read_masks_foreign_notifications() {
        let store = InMemoryStore::new();
        let bob = store.add_user("bob");
        let alice = store.add_user("alice");
        let carol = store.add_user("carol");
        let notification = notify(&store, bob.id, alice.id);
        let service = NotificationService::new(store.clone());

        let err = service
            .mark_read(carol.id, notification.id)
            .await
            .expect_err("stranger must not see it");
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = service
            .mark_read(alice.id, notification.id)
            .await
            .expect_err("actor must not mark it");
        assert!(matches!(err, DomainError::Forbidden));

        let err = service
            .mark_read(carol.id, 9_999)
            .await
            .expect_err("missing notification");
        assert!(matches!(err, DomainError::NotFound(_)));

        assert!(store.notifications().iter().all(|n| !n.read));
    }

    #[tokio::test]
    async fn mark_all_read_only_touches_own_unread() {
        let store = InMemoryStore::new();
        let bob = store.add_user("bob");
        let alice = store.add_user("alice");
        notify(&store, bob.id, alice.id);
        notify(&store, bob.id, alice.id);
        notify(&store, alice.id, bob.id);
        let service = NotificationService::new(store);

        assert_eq!(service.mark_all_read(bob.id).await.expect("must update"), 2);
        assert_eq!(service.mark_all_read(bob.id).await.expect("must update"), 0);

        let alice_unread = service
            .list(alice.id, true, first_page())
            .await
            .expect("list must succeed");
        assert_eq!(alice_unread.total, 1);
    }
}
