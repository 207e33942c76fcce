use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::handlers::common::PageQuery;
use crate::presentation::http::handlers::posts::PostPageDto;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/api/feed",
    tag = "feed",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("page" = Option<u32>, Query, description = "Page number, starting at 1"),
        ("page_size" = Option<u32>, Query, description = "Items per page (capped at 100)")
    ),
    responses(
        (status = 200, description = "Posts by followed accounts, newest first", body = PostPageDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn feed(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<PostPageDto>)> {
    let pagination = query.resolve(&state.page_limits)?;
    let page = state.social_service.feed(auth.user_id, pagination).await?;
    Ok((StatusCode::OK, Json(PostPageDto::from(page))))
}
