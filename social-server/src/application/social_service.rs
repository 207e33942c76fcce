use tracing::{debug, info};

use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::notification::{NotificationDraft, VERB_FOLLOWED};
use crate::domain::pagination::{Page, Pagination};
use crate::domain::post::Post;
use crate::domain::user::{User, UserProfile};

/// Follow relation, follow-based feed and account profiles.
pub(crate) struct SocialService<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    users: U,
    posts: P,
}

impl<U, P> SocialService<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    pub(crate) fn new(users: U, posts: P) -> Self {
        Self { users, posts }
    }

    /// Re-following is a silent success; only a new edge notifies the target.
    pub(crate) async fn follow(&self, actor_id: i64, target_id: i64) -> Result<User, DomainError> {
        if actor_id == target_id {
            return Err(DomainError::SelfReference);
        }
        let target = self.require_user(target_id).await?;

        let notify = NotificationDraft::for_action(target.id, actor_id, VERB_FOLLOWED);
        if self.users.add_follow(actor_id, target.id, notify).await? {
            info!(actor_id, target_id, "follow added");
        } else {
            debug!(actor_id, target_id, "already following");
        }
        Ok(target)
    }

    /// Unfollowing someone not followed is a silent success.
    pub(crate) async fn unfollow(&self, actor_id: i64, target_id: i64) -> Result<User, DomainError> {
        if actor_id == target_id {
            return Err(DomainError::SelfReference);
        }
        let target = self.require_user(target_id).await?;

        if self.users.remove_follow(actor_id, target.id).await? {
            info!(actor_id, target_id, "follow removed");
        }
        Ok(target)
    }

    pub(crate) async fn following(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<User>, DomainError> {
        self.users.list_following(user_id, pagination).await
    }

    pub(crate) async fn followers(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<User>, DomainError> {
        self.users.list_followers(user_id, pagination).await
    }

    pub(crate) async fn profile(&self, user_id: i64) -> Result<UserProfile, DomainError> {
        let user = self.require_user(user_id).await?;
        let counts = self.users.follow_counts(user.id).await?;
        Ok(UserProfile { user, counts })
    }

    /// Posts by followed accounts, newest first; empty when following nobody.
    pub(crate) async fn feed(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<Post>, DomainError> {
        self.posts.list_feed(user_id, pagination).await
    }

    async fn require_user(&self, user_id: i64) -> Result<User, DomainError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {user_id}")))
    }
}
