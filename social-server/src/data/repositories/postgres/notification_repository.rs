use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::data::notification_repository::NotificationRepository;
use crate::domain::error::DomainError;
use crate::domain::notification::{NewNotification, Notification, target_from_columns};
use crate::domain::pagination::{Page, Pagination};

const NOTIFICATION_COLUMNS: &str = r#"
    n.id,
    n.recipient_id,
    n.actor_id,
    u.username AS actor_username,
    n.verb,
    n.target_kind,
    n.target_id,
    n.is_read,
    n.created_at
"#;

#[derive(Debug, Clone)]
pub(crate) struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    recipient_id: i64,
    actor_id: i64,
    actor_username: String,
    verb: String,
    target_kind: Option<String>,
    target_id: Option<i64>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn get_notification(&self, id: i64) -> Result<Option<Notification>, DomainError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications n
            JOIN users u ON u.id = n.actor_id
            WHERE n.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_notification_db_error)?;

        row.map(map_row_to_notification).transpose()
    }

    async fn list_notifications(
        &self,
        recipient_id: i64,
        unread_only: bool,
        pagination: Pagination,
    ) -> Result<Page<Notification>, DomainError> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications n
            JOIN users u ON u.id = n.actor_id
            WHERE n.recipient_id = $1 AND (NOT $2 OR NOT n.is_read)
            ORDER BY n.created_at DESC, n.id DESC
            LIMIT $3
            OFFSET $4
            "#
        ))
        .bind(recipient_id)
        .bind(unread_only)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_notification_db_error)?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM notifications n
            WHERE n.recipient_id = $1 AND (NOT $2 OR NOT n.is_read)
            "#,
        )
        .bind(recipient_id)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await
        .map_err(map_notification_db_error)?;

        let notifications = rows
            .into_iter()
            .map(map_row_to_notification)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(notifications, total, pagination))
    }

    async fn mark_read_owned(
        &self,
        notification_id: i64,
        recipient_id: i64,
    ) -> Result<Option<Notification>, DomainError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            WITH n AS (
                UPDATE notifications
                SET is_read = TRUE
                WHERE id = $1 AND recipient_id = $2
                RETURNING id, recipient_id, actor_id, verb, target_kind, target_id, is_read, created_at
            )
            SELECT {NOTIFICATION_COLUMNS}
            FROM n
            JOIN users u ON u.id = n.actor_id
            "#
        ))
        .bind(notification_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_notification_db_error)?;

        row.map(map_row_to_notification).transpose()
    }

    async fn mark_all_read(&self, recipient_id: i64) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE recipient_id = $1 AND NOT is_read
            "#,
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(map_notification_db_error)?;

        Ok(result.rows_affected())
    }
}

/// Runs on the caller's connection so the notification shares the
/// transaction of the row that triggered it.
pub(crate) async fn insert_notification(
    conn: &mut PgConnection,
    input: &NewNotification,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notifications (recipient_id, actor_id, verb, target_kind, target_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(input.recipient_id)
    .bind(input.actor_id)
    .bind(input.verb)
    .bind(input.target.map(|target| target.kind.as_str()))
    .bind(input.target.map(|target| target.id))
    .execute(conn)
    .await?;
    Ok(())
}

fn map_row_to_notification(row: NotificationRow) -> Result<Notification, DomainError> {
    let target = target_from_columns(row.target_kind.as_deref(), row.target_id)?;
    Ok(Notification {
        id: row.id,
        recipient_id: row.recipient_id,
        actor_id: row.actor_id,
        actor_username: row.actor_username,
        verb: row.verb,
        target,
        read: row.is_read,
        created_at: row.created_at,
    })
}

fn map_notification_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("user".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
