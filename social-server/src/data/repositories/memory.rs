//! Shared in-memory store backing the service tests.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::data::like_repository::LikeRepository;
use crate::data::notification_repository::NotificationRepository;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::like::Like;
use crate::domain::listing::{
    CommentQuery, CommentSortField, PostQuery, PostSortField, SortDirection, SortKey,
};
use crate::domain::notification::{NewNotification, Notification, NotificationDraft, TargetKind};
use crate::domain::pagination::{Page, Pagination};
use crate::domain::post::Post;
use crate::domain::user::{FollowCounts, User};

#[derive(Default)]
struct State {
    users: Vec<UserCredentials>,
    follows: Vec<(i64, i64)>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
    notifications: Vec<Notification>,
    next_id: i64,
    ticks: i64,
    notifications_down: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps keep "newest first" deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("fixed epoch must be valid")
            + Duration::seconds(self.ticks)
    }

    fn username(&self, user_id: i64) -> Result<String, DomainError> {
        self.users
            .iter()
            .find(|creds| creds.user.id == user_id)
            .map(|creds| creds.user.username.clone())
            .ok_or_else(|| DomainError::NotFound("user".to_string()))
    }

    /// Checks and builds the record without storing it, so a caller can
    /// bail out before writing anything.
    fn prepare_notification(&mut self, input: NewNotification) -> Result<Notification, DomainError> {
        if self.notifications_down {
            return Err(DomainError::Unexpected(
                "notification store unavailable".to_string(),
            ));
        }
        self.username(input.recipient_id)?;
        let actor_username = self.username(input.actor_id)?;
        let id = self.next_id();
        let created_at = self.tick();
        Ok(Notification {
            id,
            recipient_id: input.recipient_id,
            actor_id: input.actor_id,
            actor_username,
            verb: input.verb.to_string(),
            target: input.target,
            read: false,
            created_at,
        })
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory store mutex poisoned")
    }

    pub(crate) fn add_user(&self, username: &str) -> User {
        let mut state = self.lock();
        let id = state.next_id();
        let created_at = state.tick();
        let user = User::new(id, username, format!("{username}@example.com"), created_at)
            .expect("seeded user must be valid");
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: "not-a-real-hash".to_string(),
        });
        user
    }

    pub(crate) fn seed_notification(&self, input: NewNotification) -> Notification {
        let mut state = self.lock();
        let notification = state
            .prepare_notification(input)
            .expect("seeded notification must be valid");
        state.notifications.push(notification.clone());
        notification
    }

    /// While down, every write that carries a notification fails.
    pub(crate) fn set_notifications_down(&self, down: bool) {
        self.lock().notifications_down = down;
    }

    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    pub(crate) fn likes(&self) -> Vec<Like> {
        self.lock().likes.clone()
    }

    pub(crate) fn comments(&self) -> Vec<Comment> {
        self.lock().comments.clone()
    }

    pub(crate) fn follows(&self) -> Vec<(i64, i64)> {
        self.lock().follows.clone()
    }
}

fn paginate<T: Clone>(items: &[T], pagination: Pagination) -> Page<T> {
    let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
    let page_items = items.iter().skip(offset).take(limit).cloned().collect();
    Page::new(page_items, items.len() as i64, pagination)
}

fn matches_terms(terms: &[String], fields: &[&str]) -> bool {
    terms.iter().all(|term| {
        let term = term.to_lowercase();
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    })
}

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn compare_posts(a: &Post, b: &Post, keys: &[SortKey<PostSortField>]) -> Ordering {
    if keys.is_empty() {
        return a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id));
    }
    keys.iter()
        .map(|key| {
            let ordering = match key.field {
                PostSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                PostSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                PostSortField::Title => a.title.cmp(&b.title),
            };
            apply_direction(ordering, key.direction)
        })
        .fold(Ordering::Equal, Ordering::then)
        .then(a.id.cmp(&b.id))
}

fn compare_comments(a: &Comment, b: &Comment, keys: &[SortKey<CommentSortField>]) -> Ordering {
    if keys.is_empty() {
        return a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id));
    }
    keys.iter()
        .map(|key| {
            let ordering = match key.field {
                CommentSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                CommentSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            apply_direction(ordering, key.direction)
        })
        .fold(Ordering::Equal, Ordering::then)
        .then(a.id.cmp(&b.id))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state.users.iter().any(|c| c.user.username == input.username) {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        if state.users.iter().any(|c| c.user.email == input.email) {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        let id = state.next_id();
        let created_at = state.tick();
        let user = User::new(id, input.username, input.email, created_at)?;
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    async fn add_follow(
        &self,
        follower_id: i64,
        followee_id: i64,
        notify: Option<NotificationDraft>,
    ) -> Result<bool, DomainError> {
        let mut state = self.lock();
        if follower_id == followee_id {
            return Err(DomainError::SelfReference);
        }
        state.username(followee_id)?;
        if state.follows.contains(&(follower_id, followee_id)) {
            return Ok(false);
        }
        let notification = notify
            .map(|draft| state.prepare_notification(draft.about(TargetKind::User, follower_id)))
            .transpose()?;
        state.follows.push((follower_id, followee_id));
        state.notifications.extend(notification);
        Ok(true)
    }

    async fn remove_follow(&self, follower_id: i64, followee_id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.follows.len();
        state
            .follows
            .retain(|edge| *edge != (follower_id, followee_id));
        Ok(state.follows.len() != before)
    }

    async fn list_following(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<User>, DomainError> {
        let state = self.lock();
        let mut users: Vec<User> = state
            .users
            .iter()
            .filter(|c| state.follows.contains(&(user_id, c.user.id)))
            .map(|c| c.user.clone())
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(paginate(&users, pagination))
    }

    async fn list_followers(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<User>, DomainError> {
        let state = self.lock();
        let mut users: Vec<User> = state
            .users
            .iter()
            .filter(|c| state.follows.contains(&(c.user.id, user_id)))
            .map(|c| c.user.clone())
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(paginate(&users, pagination))
    }

    async fn follow_counts(&self, user_id: i64) -> Result<FollowCounts, DomainError> {
        let state = self.lock();
        Ok(FollowCounts {
            followers: state.follows.iter().filter(|(_, to)| *to == user_id).count() as i64,
            following: state
                .follows
                .iter()
                .filter(|(from, _)| *from == user_id)
                .count() as i64,
        })
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.lock();
        let author_username = state
            .username(input.author_id)
            .map_err(|_| DomainError::NotFound("author".to_string()))?;
        let id = state.next_id();
        let now = state.tick();
        let post = Post::new(
            id,
            input.title,
            input.content,
            input.author_id,
            author_username,
            now,
            now,
        )?;
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.lock().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        let now = state.tick();
        let Some(post) = state
            .posts
            .iter_mut()
            .find(|p| p.id == post_id && p.author_id == owner_id)
        else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        post.updated_at = now;
        Ok(Some(post.clone()))
    }

    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.posts.len();
        state
            .posts
            .retain(|p| !(p.id == post_id && p.author_id == owner_id));
        let deleted = state.posts.len() != before;
        if deleted {
            state.comments.retain(|c| c.post_id != post_id);
            state.likes.retain(|l| l.post_id != post_id);
        }
        Ok(deleted)
    }

    async fn list_posts(
        &self,
        query: &PostQuery,
        pagination: Pagination,
    ) -> Result<Page<Post>, DomainError> {
        let state = self.lock();
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| query.author_id.is_none_or(|author| p.author_id == author))
            .filter(|p| matches_terms(&query.search, &[p.title.as_str(), p.content.as_str()]))
            .cloned()
            .collect();
        posts.sort_by(|a, b| compare_posts(a, b, &query.ordering));
        Ok(paginate(&posts, pagination))
    }

    async fn list_feed(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<Post>, DomainError> {
        let state = self.lock();
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| state.follows.contains(&(user_id, p.author_id)))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(&posts, pagination))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create_comment(
        &self,
        input: NewComment,
        notify: Option<NotificationDraft>,
    ) -> Result<Comment, DomainError> {
        let mut state = self.lock();
        if !state.posts.iter().any(|p| p.id == input.post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        let author_username = state.username(input.author_id)?;
        let id = state.next_id();
        let now = state.tick();
        let comment = Comment::new(
            id,
            input.content,
            input.author_id,
            author_username,
            input.post_id,
            now,
            now,
        )?;
        let notification = notify
            .map(|draft| state.prepare_notification(draft.about(TargetKind::Comment, id)))
            .transpose()?;
        state.comments.push(comment.clone());
        state.notifications.extend(notification);
        Ok(comment)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        Ok(self.lock().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn update_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError> {
        let mut state = self.lock();
        let now = state.tick();
        let Some(comment) = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id && c.author_id == owner_id)
        else {
            return Ok(None);
        };
        comment.content = patch.content;
        comment.updated_at = now;
        Ok(Some(comment.clone()))
    }

    async fn delete_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
    ) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.comments.len();
        state
            .comments
            .retain(|c| !(c.id == comment_id && c.author_id == owner_id));
        Ok(state.comments.len() != before)
    }

    async fn list_comments(
        &self,
        query: &CommentQuery,
        pagination: Pagination,
    ) -> Result<Page<Comment>, DomainError> {
        let state = self.lock();
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| query.post_id.is_none_or(|post| c.post_id == post))
            .filter(|c| query.author_id.is_none_or(|author| c.author_id == author))
            .filter(|c| matches_terms(&query.search, &[c.content.as_str()]))
            .cloned()
            .collect();
        comments.sort_by(|a, b| compare_comments(a, b, &query.ordering));
        Ok(paginate(&comments, pagination))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn insert_like(
        &self,
        user_id: i64,
        post_id: i64,
        notify: Option<NotificationDraft>,
    ) -> Result<Option<Like>, DomainError> {
        let mut state = self.lock();
        if !state.posts.iter().any(|p| p.id == post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        if state
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.post_id == post_id)
        {
            return Ok(None);
        }
        let id = state.next_id();
        let created_at = state.tick();
        let like = Like {
            id,
            user_id,
            post_id,
            created_at,
        };
        let notification = notify
            .map(|draft| state.prepare_notification(draft.about(TargetKind::Post, post_id)))
            .transpose()?;
        state.likes.push(like.clone());
        state.notifications.extend(notification);
        Ok(Some(like))
    }

    async fn delete_like(&self, user_id: i64, post_id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.likes.len();
        state
            .likes
            .retain(|l| !(l.user_id == user_id && l.post_id == post_id));
        Ok(state.likes.len() != before)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn get_notification(&self, id: i64) -> Result<Option<Notification>, DomainError> {
        Ok(self
            .lock()
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn list_notifications(
        &self,
        recipient_id: i64,
        unread_only: bool,
        pagination: Pagination,
    ) -> Result<Page<Notification>, DomainError> {
        let state = self.lock();
        let mut notifications: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !(unread_only && n.read))
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(&notifications, pagination))
    }

    async fn mark_read_owned(
        &self,
        notification_id: i64,
        recipient_id: i64,
    ) -> Result<Option<Notification>, DomainError> {
        let mut state = self.lock();
        let Some(notification) = state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && n.recipient_id == recipient_id)
        else {
            return Ok(None);
        };
        notification.read = true;
        Ok(Some(notification.clone()))
    }

    async fn mark_all_read(&self, recipient_id: i64) -> Result<u64, DomainError> {
        let mut state = self.lock();
        let mut updated = 0;
        for notification in state
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.read)
        {
            notification.read = true;
            updated += 1;
        }
        Ok(updated)
    }
}
