pub(crate) mod comment_repository;
pub(crate) mod like_repository;
pub(crate) mod notification_repository;
pub(crate) mod post_repository;
pub(crate) mod repositories;
pub(crate) mod user_repository;
