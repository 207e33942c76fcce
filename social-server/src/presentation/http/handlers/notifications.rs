use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::notification::{Notification, NotificationTarget};
use crate::domain::pagination::Page;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub(crate) struct ListNotificationsQuery {
    pub(crate) page: Option<u32>,
    pub(crate) page_size: Option<u32>,
    #[serde(default)]
    pub(crate) unread: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct NotificationTargetDto {
    /// One of `post`, `comment`, `user`.
    pub(crate) kind: String,
    pub(crate) id: i64,
}

impl From<NotificationTarget> for NotificationTargetDto {
    fn from(target: NotificationTarget) -> Self {
        Self {
            kind: target.kind.as_str().to_string(),
            id: target.id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct NotificationDto {
    pub(crate) id: i64,
    pub(crate) actor: String,
    pub(crate) actor_id: i64,
    pub(crate) verb: String,
    pub(crate) target: Option<NotificationTargetDto>,
    pub(crate) read: bool,
    pub(crate) timestamp: DateTime<Utc>,
}

impl From<Notification> for NotificationDto {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            actor: notification.actor_username,
            actor_id: notification.actor_id,
            verb: notification.verb,
            target: notification.target.map(NotificationTargetDto::from),
            read: notification.read,
            timestamp: notification.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct NotificationPageDto {
    pub(crate) count: i64,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) results: Vec<NotificationDto>,
}

impl From<Page<Notification>> for NotificationPageDto {
    fn from(page: Page<Notification>) -> Self {
        let page = page.map(NotificationDto::from);
        Self {
            count: page.total,
            page: page.page,
            page_size: page.page_size,
            results: page.items,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct MarkAllReadDto {
    pub(crate) updated: u64,
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("page" = Option<u32>, Query, description = "Page number, starting at 1"),
        ("page_size" = Option<u32>, Query, description = "Items per page (capped at 100)"),
        ("unread" = Option<bool>, Query, description = "Only unread notifications")
    ),
    responses(
        (status = 200, description = "Notifications of the current user, newest first", body = NotificationPageDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<(StatusCode, Json<NotificationPageDto>)> {
    let pagination = state.page_limits.resolve(query.page, query.page_size)?;
    let page = state
        .notification_service
        .list(auth.user_id, query.unread, pagination)
        .await?;
    Ok((StatusCode::OK, Json(NotificationPageDto::from(page))))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Notification marked read", body = NotificationDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is the actor, not the recipient"),
        (status = 404, description = "Notification not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn mark_read(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<NotificationDto>)> {
    let notification = state
        .notification_service
        .mark_read(auth.user_id, id)
        .await?;
    Ok((StatusCode::OK, Json(NotificationDto::from(notification))))
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Unread notifications marked read", body = MarkAllReadDto),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<(StatusCode, Json<MarkAllReadDto>)> {
    let updated = state
        .notification_service
        .mark_all_read(auth.user_id)
        .await?;
    Ok((StatusCode::OK, Json(MarkAllReadDto { updated })))
}
