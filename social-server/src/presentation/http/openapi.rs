use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::accounts::{
    AuthResponseDto, FollowStatusDto, LoginDto, ProfileDto, RegisterDto, UserDto, UserPageDto,
    UserSummaryDto,
};
use crate::presentation::http::handlers::comments::{
    CommentDto, CommentPageDto, CreateCommentDto, UpdateCommentDto,
};
use crate::presentation::http::handlers::notifications::{
    MarkAllReadDto, NotificationDto, NotificationPageDto, NotificationTargetDto,
};
use crate::presentation::http::handlers::posts::{
    CreatePostDto, LikeDto, PatchPostDto, PostDto, PostPageDto, ReplacePostDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::accounts::register,
        crate::presentation::http::handlers::accounts::login,
        crate::presentation::http::handlers::accounts::profile,
        crate::presentation::http::handlers::accounts::follow,
        crate::presentation::http::handlers::accounts::unfollow,
        crate::presentation::http::handlers::accounts::following,
        crate::presentation::http::handlers::accounts::followers,
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::replace_post,
        crate::presentation::http::handlers::posts::patch_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::posts::like_post,
        crate::presentation::http::handlers::posts::unlike_post,
        crate::presentation::http::handlers::comments::list_comments,
        crate::presentation::http::handlers::comments::get_comment,
        crate::presentation::http::handlers::comments::create_comment,
        crate::presentation::http::handlers::comments::update_comment,
        crate::presentation::http::handlers::comments::delete_comment,
        crate::presentation::http::handlers::feed::feed,
        crate::presentation::http::handlers::notifications::list_notifications,
        crate::presentation::http::handlers::notifications::mark_read,
        crate::presentation::http::handlers::notifications::mark_all_read
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            UserSummaryDto,
            ProfileDto,
            FollowStatusDto,
            UserPageDto,
            CreatePostDto,
            ReplacePostDto,
            PatchPostDto,
            PostDto,
            PostPageDto,
            LikeDto,
            CreateCommentDto,
            UpdateCommentDto,
            CommentDto,
            CommentPageDto,
            NotificationTargetDto,
            NotificationDto,
            NotificationPageDto,
            MarkAllReadDto
        )
    ),
    tags(
        (name = "accounts", description = "Registration, login and the follow graph"),
        (name = "posts", description = "Post endpoints and likes"),
        (name = "comments", description = "Comment endpoints"),
        (name = "feed", description = "Posts by followed accounts"),
        (name = "notifications", description = "Likes, comments and follows addressed to the caller")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn document_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/accounts/register",
            "/api/accounts/follow/{user_id}",
            "/api/posts/{id}/like",
            "/api/comments",
            "/api/feed",
            "/api/notifications/read-all",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components must be present");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
