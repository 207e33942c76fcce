use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::like_repository::LikeRepository;
use crate::data::repositories::postgres::notification_repository::insert_notification;
use crate::domain::error::DomainError;
use crate::domain::like::Like;
use crate::domain::notification::{NotificationDraft, TargetKind};

#[derive(Debug, Clone)]
pub(crate) struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LikeRow {
    id: i64,
    user_id: i64,
    post_id: i64,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn insert_like(
        &self,
        user_id: i64,
        post_id: i64,
        notify: Option<NotificationDraft>,
    ) -> Result<Option<Like>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_like_db_error)?;

        let row = sqlx::query_as::<_, LikeRow>(
            r#"
            INSERT INTO likes (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT likes_user_post_key DO NOTHING
            RETURNING id, user_id, post_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_like_db_error)?;

        // Dropping the transaction rolls it back.
        let Some(row) = row else {
            return Ok(None);
        };

        if let Some(draft) = notify {
            insert_notification(&mut tx, &draft.about(TargetKind::Post, row.post_id))
                .await
                .map_err(map_like_db_error)?;
        }
        tx.commit().await.map_err(map_like_db_error)?;

        Ok(Some(Like {
            id: row.id,
            user_id: row.user_id,
            post_id: row.post_id,
            created_at: row.created_at,
        }))
    }

    async fn delete_like(&self, user_id: i64, post_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(map_like_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_like_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("post".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
