use tracing::{debug, info};

use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::like::Like;
use crate::domain::notification::{NotificationDraft, VERB_LIKED_POST};
use crate::domain::post::Post;

pub(crate) struct LikeService<P, L>
where
    P: PostRepository,
    L: LikeRepository,
{
    posts: P,
    likes: L,
}

impl<P, L> LikeService<P, L>
where
    P: PostRepository,
    L: LikeRepository,
{
    pub(crate) fn new(posts: P, likes: L) -> Self {
        Self { posts, likes }
    }

    /// A second like of the same post is an error, never a duplicate row.
    /// The author's notification is stored with the like or not at all.
    pub(crate) async fn like(&self, user_id: i64, post_id: i64) -> Result<Like, DomainError> {
        let post = self.require_post(post_id).await?;

        let notify = NotificationDraft::for_action(post.author_id, user_id, VERB_LIKED_POST);
        let like = self
            .likes
            .insert_like(user_id, post.id, notify)
            .await?
            .ok_or(DomainError::AlreadyLiked(post.id))?;
        info!(user_id, post_id, "post liked");

        Ok(like)
    }

    /// Idempotent; notifications sent for the like are kept.
    pub(crate) async fn unlike(&self, user_id: i64, post_id: i64) -> Result<(), DomainError> {
        let post = self.require_post(post_id).await?;

        if self.likes.delete_like(user_id, post.id).await? {
            info!(user_id, post_id, "post unliked");
        } else {
            debug!(user_id, post_id, "unlike without like");
        }
        Ok(())
    }

    async fn require_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))
    }
}
