use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::pagination::Page;
use crate::domain::user::{LoginRequest, RegisterRequest, User, UserProfile};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::handlers::common::PageQuery;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) user: UserDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Public view of another account; never carries the email.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserSummaryDto {
    pub(crate) id: i64,
    pub(crate) username: String,
}

impl From<User> for UserSummaryDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfileDto {
    #[serde(flatten)]
    pub(crate) user: UserDto,
    pub(crate) followers_count: i64,
    pub(crate) following_count: i64,
}

impl From<UserProfile> for ProfileDto {
    fn from(profile: UserProfile) -> Self {
        Self {
            user: profile.user.into(),
            followers_count: profile.counts.followers,
            following_count: profile.counts.following,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FollowStatusDto {
    pub(crate) message: String,
    pub(crate) user: UserSummaryDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserPageDto {
    pub(crate) count: i64,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) results: Vec<UserSummaryDto>,
}

impl From<Page<User>> for UserPageDto {
    fn from(page: Page<User>) -> Self {
        let page = page.map(UserSummaryDto::from);
        Self {
            count: page.total,
            page: page.page,
            page_size: page.page_size,
            results: page.items,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/accounts/register",
    tag = "accounts",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Registered successfully", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = RegisterRequest {
        username: dto.username,
        email: dto.email,
        password: dto.password,
    };

    let result = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponseDto {
            access_token: result.access_token,
            user: result.user.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/accounts/login",
    tag = "accounts",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = LoginRequest {
        username: dto.username,
        password: dto.password,
    };

    let result = state.auth_service.login(req).await?;

    Ok((
        StatusCode::OK,
        Json(AuthResponseDto {
            access_token: result.access_token,
            user: result.user.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/accounts/profile",
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile of the current user", body = ProfileDto),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<(StatusCode, Json<ProfileDto>)> {
    let profile = state.social_service.profile(auth.user_id).await?;
    Ok((StatusCode::OK, Json(ProfileDto::from(profile))))
}

#[utoipa::path(
    post,
    path = "/api/accounts/follow/{user_id}",
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("user_id" = i64, Path, description = "Account to follow")
    ),
    responses(
        (status = 200, description = "Following the account", body = FollowStatusDto),
        (status = 400, description = "Cannot follow yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn follow(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(user_id): Path<i64>,
) -> AppResult<(StatusCode, Json<FollowStatusDto>)> {
    let target = state.social_service.follow(auth.user_id, user_id).await?;

    Ok((
        StatusCode::OK,
        Json(FollowStatusDto {
            message: format!("you are now following {}", target.username),
            user: target.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/accounts/unfollow/{user_id}",
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("user_id" = i64, Path, description = "Account to unfollow")
    ),
    responses(
        (status = 200, description = "Not following the account", body = FollowStatusDto),
        (status = 400, description = "Cannot unfollow yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn unfollow(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(user_id): Path<i64>,
) -> AppResult<(StatusCode, Json<FollowStatusDto>)> {
    let target = state.social_service.unfollow(auth.user_id, user_id).await?;

    Ok((
        StatusCode::OK,
        Json(FollowStatusDto {
            message: format!("you have unfollowed {}", target.username),
            user: target.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/accounts/following",
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("page" = Option<u32>, Query, description = "Page number, starting at 1"),
        ("page_size" = Option<u32>, Query, description = "Items per page (capped at 100)")
    ),
    responses(
        (status = 200, description = "Accounts the current user follows", body = UserPageDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn following(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<UserPageDto>)> {
    let pagination = query.resolve(&state.page_limits)?;
    let page = state
        .social_service
        .following(auth.user_id, pagination)
        .await?;
    Ok((StatusCode::OK, Json(UserPageDto::from(page))))
}

#[utoipa::path(
    get,
    path = "/api/accounts/followers",
    tag = "accounts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("page" = Option<u32>, Query, description = "Page number, starting at 1"),
        ("page_size" = Option<u32>, Query, description = "Items per page (capped at 100)")
    ),
    responses(
        (status = 200, description = "Accounts following the current user", body = UserPageDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn followers(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<UserPageDto>)> {
    let pagination = query.resolve(&state.page_limits)?;
    let page = state
        .social_service
        .followers(auth.user_id, pagination)
        .await?;
    Ok((StatusCode::OK, Json(UserPageDto::from(page))))
}
