pub(crate) mod comment;
pub(crate) mod error;
pub(crate) mod like;
pub(crate) mod listing;
pub(crate) mod notification;
pub(crate) mod pagination;
pub(crate) mod post;
pub(crate) mod user;
mod validation;
