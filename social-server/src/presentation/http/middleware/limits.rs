use std::time::Duration;

use axum::{BoxError, Json, Router, error_handling::HandleErrorLayer, http::StatusCode};
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::{TimeoutLayer, error::Elapsed};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::warn;

use crate::presentation::http::app_error::ErrorBody;

#[derive(Debug, Clone, Copy)]
pub(crate) struct HttpLimits {
    pub(crate) body_limit_bytes: usize,
    pub(crate) concurrency_limit: usize,
    pub(crate) request_timeout: Duration,
}

/// Request body cap, in-flight request cap shared by all routes, and a
/// per-request deadline.
pub(crate) fn apply_limits(router: Router, limits: HttpLimits) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_limit_error))
                .layer(TimeoutLayer::new(limits.request_timeout))
                .layer(GlobalConcurrencyLimitLayer::new(limits.concurrency_limit)),
        )
        .layer(RequestBodyLimitLayer::new(limits.body_limit_bytes))
}

async fn handle_limit_error(err: BoxError) -> (StatusCode, Json<ErrorBody>) {
    if err.is::<Elapsed>() {
        warn!("request timed out");
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorBody {
                error: "request timed out".to_string(),
            }),
        );
    }

    warn!(error = %err, "request rejected by service limits");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorBody {
            error: "service unavailable".to_string(),
        }),
    )
}
