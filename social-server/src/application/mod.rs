pub(crate) mod auth_service;
pub(crate) mod comment_service;
pub(crate) mod like_service;
pub(crate) mod notification_service;
pub(crate) mod post_service;
pub(crate) mod social_service;
