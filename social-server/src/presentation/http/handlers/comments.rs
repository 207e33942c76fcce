use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::comment::{Comment, CreateCommentRequest, UpdateCommentRequest};
use crate::domain::listing::{CommentQuery, parse_ordering, parse_search_terms};
use crate::domain::pagination::Page;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateCommentDto {
    /// Id of the commented post.
    #[validate(range(min = 1))]
    pub(crate) post: i64,
    #[validate(length(min = 1))]
    pub(crate) content: String,
}

/// Shared by `PUT` and `PATCH`; the parent post never changes.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateCommentDto {
    #[validate(length(min = 1))]
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListCommentsQuery {
    pub(crate) page: Option<u32>,
    pub(crate) page_size: Option<u32>,
    pub(crate) search: Option<String>,
    pub(crate) post: Option<i64>,
    pub(crate) author: Option<i64>,
    pub(crate) ordering: Option<String>,
}

impl ListCommentsQuery {
    fn to_query(&self) -> CommentQuery {
        CommentQuery {
            search: parse_search_terms(self.search.as_deref()),
            post_id: self.post,
            author_id: self.author,
            ordering: parse_ordering(self.ordering.as_deref()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) content: String,
    pub(crate) author: String,
    pub(crate) author_id: i64,
    pub(crate) post: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            author: comment.author_username,
            author_id: comment.author_id,
            post: comment.post_id,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentPageDto {
    pub(crate) count: i64,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) results: Vec<CommentDto>,
}

impl From<Page<Comment>> for CommentPageDto {
    fn from(page: Page<Comment>) -> Self {
        let page = page.map(CommentDto::from);
        Self {
            count: page.total,
            page: page.page,
            page_size: page.page_size,
            results: page.items,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/comments",
    tag = "comments",
    params(
        ("page" = Option<u32>, Query, description = "Page number, starting at 1"),
        ("page_size" = Option<u32>, Query, description = "Items per page (capped at 100)"),
        ("search" = Option<String>, Query, description = "Whitespace-separated terms matched against content"),
        ("post" = Option<i64>, Query, description = "Only comments on this post id"),
        ("author" = Option<i64>, Query, description = "Only comments by this author id"),
        ("ordering" = Option<String>, Query, description = "Comma-separated created_at, updated_at; prefix with - for descending")
    ),
    responses(
        (status = 200, description = "Comments listed", body = CommentPageDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<ListCommentsQuery>,
) -> AppResult<(StatusCode, Json<CommentPageDto>)> {
    let pagination = state.page_limits.resolve(query.page, query.page_size)?;

    let page = state
        .comment_service
        .list_comments(&query.to_query(), pagination)
        .await?;

    Ok((StatusCode::OK, Json(CommentPageDto::from(page))))
}

#[utoipa::path(
    get,
    path = "/api/comments/{id}",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment found", body = CommentDto),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    let result = state.comment_service.get_comment(id).await?;
    Ok((StatusCode::OK, Json(CommentDto::from(result))))
}

#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreateCommentDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    dto.validate()?;
    let req = CreateCommentRequest {
        post_id: dto.post,
        content: dto.content,
    };

    let result = state
        .comment_service
        .create_comment(auth.user_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Comment id")
    ),
    request_body = UpdateCommentDto,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Comment not found or not owned by the caller"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateCommentDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    dto.validate()?;
    let req = UpdateCommentRequest {
        content: dto.content,
    };

    let result = state
        .comment_service
        .update_comment(auth.user_id, id, req)
        .await?;
    Ok((StatusCode::OK, Json(CommentDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Comment not found or not owned by the caller"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .comment_service
        .delete_comment(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
