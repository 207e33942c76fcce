use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::like_pattern;
use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::data::repositories::postgres::notification_repository::insert_notification;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::listing::{CommentQuery, SortField};
use crate::domain::notification::{NotificationDraft, TargetKind};
use crate::domain::pagination::{Page, Pagination};

const COMMENT_COLUMNS: &str = r#"
    c.id,
    c.content,
    c.author_id,
    u.username AS author_username,
    c.post_id,
    c.created_at,
    c.updated_at
"#;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    content: String,
    author_id: i64,
    author_username: String,
    post_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(
        &self,
        input: NewComment,
        notify: Option<NotificationDraft>,
    ) -> Result<Comment, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_comment_db_error)?;

        let row = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            WITH c AS (
                INSERT INTO comments (content, author_id, post_id)
                VALUES ($1, $2, $3)
                RETURNING id, content, author_id, post_id, created_at, updated_at
            )
            SELECT {COMMENT_COLUMNS}
            FROM c
            JOIN users u ON u.id = c.author_id
            "#
        ))
        .bind(&input.content)
        .bind(input.author_id)
        .bind(input.post_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_comment_db_error)?;

        if let Some(draft) = notify {
            insert_notification(&mut tx, &draft.about(TargetKind::Comment, row.id))
                .await
                .map_err(map_comment_db_error)?;
        }
        tx.commit().await.map_err(map_comment_db_error)?;

        map_row_to_comment(row)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        row.map(map_row_to_comment).transpose()
    }

    async fn update_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            WITH c AS (
                UPDATE comments
                SET content = $3,
                    updated_at = NOW()
                WHERE id = $1 AND author_id = $2
                RETURNING id, content, author_id, post_id, created_at, updated_at
            )
            SELECT {COMMENT_COLUMNS}
            FROM c
            JOIN users u ON u.id = c.author_id
            "#
        ))
        .bind(comment_id)
        .bind(owner_id)
        .bind(&patch.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        row.map(map_row_to_comment).transpose()
    }

    async fn delete_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(
        &self,
        query: &CommentQuery,
        pagination: Pagination,
    ) -> Result<Page<Comment>, DomainError> {
        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id WHERE TRUE"
        ));
        push_comment_filters(&mut select, query);
        push_comment_ordering(&mut select, query);
        select
            .push(" LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows = select
            .build_query_as::<CommentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM comments c WHERE TRUE");
        push_comment_filters(&mut count, query);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        let comments = rows
            .into_iter()
            .map(map_row_to_comment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(comments, total, pagination))
    }
}

fn push_comment_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &CommentQuery) {
    if let Some(post_id) = query.post_id {
        builder.push(" AND c.post_id = ").push_bind(post_id);
    }
    if let Some(author_id) = query.author_id {
        builder.push(" AND c.author_id = ").push_bind(author_id);
    }
    for term in &query.search {
        builder
            .push(" AND c.content ILIKE ")
            .push_bind(like_pattern(term));
    }
}

fn push_comment_ordering(builder: &mut QueryBuilder<'_, Postgres>, query: &CommentQuery) {
    if query.ordering.is_empty() {
        builder.push(" ORDER BY c.created_at ASC, c.id ASC");
        return;
    }
    builder.push(" ORDER BY ");
    for key in &query.ordering {
        builder
            .push("c.")
            .push(key.field.column())
            .push(" ")
            .push(key.direction.as_sql())
            .push(", ");
    }
    builder.push("c.id ASC");
}

fn map_row_to_comment(row: CommentRow) -> Result<Comment, DomainError> {
    Comment::new(
        row.id,
        row.content,
        row.author_id,
        row.author_username,
        row.post_id,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_comment_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("comments_post_id_fkey") => "post",
            _ => "author",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
