use axum::Router;

use crate::presentation::AppState;

pub(crate) mod accounts;
pub(crate) mod comments;
pub(crate) mod feed;
pub(crate) mod notifications;
pub(crate) mod posts;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/accounts", accounts::router(state.clone()))
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/comments", comments::router(state.clone()))
        .nest("/api/feed", feed::router(state.clone()))
        .nest("/api/notifications", notifications::router(state))
}
