use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::listing::PostQuery;
use crate::domain::pagination::{Page, Pagination};
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;

    /// `None` when no post with this id is owned by `owner_id`.
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError>;

    async fn list_posts(&self, query: &PostQuery, pagination: Pagination) -> Result<Page<Post>, DomainError>;

    /// Posts authored by accounts `user_id` follows, newest first.
    async fn list_feed(&self, user_id: i64, pagination: Pagination) -> Result<Page<Post>, DomainError>;
}
