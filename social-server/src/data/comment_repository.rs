use async_trait::async_trait;

use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::listing::CommentQuery;
use crate::domain::notification::NotificationDraft;
use crate::domain::pagination::{Page, Pagination};

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) content: String,
    pub(crate) author_id: i64,
    pub(crate) post_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentPatch {
    pub(crate) content: String,
}

#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    /// The comment and its notification commit together.
    async fn create_comment(
        &self,
        input: NewComment,
        notify: Option<NotificationDraft>,
    ) -> Result<Comment, DomainError>;
    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError>;
    async fn update_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError>;
    async fn delete_comment_owned(&self, comment_id: i64, owner_id: i64) -> Result<bool, DomainError>;
    async fn list_comments(
        &self,
        query: &CommentQuery,
        pagination: Pagination,
    ) -> Result<Page<Comment>, DomainError>;
}
