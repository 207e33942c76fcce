pub(crate) mod accounts;
pub(crate) mod comments;
pub(crate) mod common;
pub(crate) mod feed;
pub(crate) mod notifications;
pub(crate) mod posts;
