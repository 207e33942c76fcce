use sqlx::PgPool;
use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::like_service::LikeService;
use crate::application::notification_service::NotificationService;
use crate::application::post_service::PostService;
use crate::application::social_service::SocialService;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::like_repository::PostgresLikeRepository;
use crate::data::repositories::postgres::notification_repository::PostgresNotificationRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::domain::pagination::PageLimits;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

type Users = PostgresUserRepository;
type Posts = PostgresPostRepository;
type Comments = PostgresCommentRepository;
type Likes = PostgresLikeRepository;
type Notifications = PostgresNotificationRepository;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pool: PgPool,
    pub(crate) auth_service: Arc<AuthService<Users>>,
    pub(crate) post_service: Arc<PostService<Posts>>,
    pub(crate) comment_service: Arc<CommentService<Comments, Posts>>,
    pub(crate) like_service: Arc<LikeService<Posts, Likes>>,
    pub(crate) social_service: Arc<SocialService<Users, Posts>>,
    pub(crate) notification_service: Arc<NotificationService<Notifications>>,
    pub(crate) jwt: Arc<JwtService>,
    pub(crate) page_limits: PageLimits,
}

impl AppState {
    /// Wires the PostgreSQL repositories into every service.
    pub(crate) fn new(pool: PgPool, jwt: JwtService, page_limits: PageLimits) -> Self {
        let users = PostgresUserRepository::new(pool.clone());
        let posts = PostgresPostRepository::new(pool.clone());
        let comments = PostgresCommentRepository::new(pool.clone());
        let likes = PostgresLikeRepository::new(pool.clone());
        let notifications = PostgresNotificationRepository::new(pool.clone());

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), jwt.clone())),
            post_service: Arc::new(PostService::new(posts.clone())),
            comment_service: Arc::new(CommentService::new(comments, posts.clone())),
            like_service: Arc::new(LikeService::new(posts.clone(), likes)),
            social_service: Arc::new(SocialService::new(users, posts)),
            notification_service: Arc::new(NotificationService::new(notifications)),
            jwt: Arc::new(jwt),
            page_limits,
            pool,
        }
    }
}
