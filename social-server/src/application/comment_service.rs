use tracing::info;

use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CreateCommentRequest, UpdateCommentRequest};
use crate::domain::error::DomainError;
use crate::domain::listing::CommentQuery;
use crate::domain::notification::{NotificationDraft, VERB_COMMENTED_POST};
use crate::domain::pagination::{Page, Pagination};

pub(crate) struct CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    comments: C,
    posts: P,
}

impl<C, P> CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    pub(crate) fn new(comments: C, posts: P) -> Self {
        Self { comments, posts }
    }

    /// Comments on someone else's post notify the post author.
    pub(crate) async fn create_comment(
        &self,
        author_id: i64,
        req: CreateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;
        let post = self
            .posts
            .get_post(req.post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {}", req.post_id)))?;

        let notify = NotificationDraft::for_action(post.author_id, author_id, VERB_COMMENTED_POST);
        let comment = self
            .comments
            .create_comment(
                NewComment {
                    content: req.content,
                    author_id,
                    post_id: post.id,
                },
                notify,
            )
            .await?;
        info!(comment_id = comment.id, post_id = post.id, author_id, "comment created");

        Ok(comment)
    }

    pub(crate) async fn get_comment(&self, id: i64) -> Result<Comment, DomainError> {
        self.comments
            .get_comment(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {id}")))
    }

    pub(crate) async fn update_comment(
        &self,
        actor_user_id: i64,
        comment_id: i64,
        req: UpdateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;
        self.comments
            .update_comment_owned(
                comment_id,
                actor_user_id,
                CommentPatch {
                    content: req.content,
                },
            )
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))
    }

    pub(crate) async fn delete_comment(
        &self,
        actor_user_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        let deleted = self
            .comments
            .delete_comment_owned(comment_id, actor_user_id)
            .await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }
        info!(comment_id, actor_user_id, "comment deleted");
        Ok(())
    }

    pub(crate) async fn list_comments(
        &self,
        query: &CommentQuery,
        pagination: Pagination,
    ) -> Result<Page<Comment>, DomainError> {
        self.comments.list_comments(query, pagination).await
    }
}
