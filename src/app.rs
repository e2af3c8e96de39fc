//! Router assembly: student routes, common routes, CORS and body limit.

use crate::config::{CorsOrigins, ServiceConfig};
use crate::routes::{common_routes_with_ready, student_routes};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => AllowOrigin::list(list.iter().cloned()),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Body size is enforced by the body extractors, so an oversized request gets the same
/// error body as any other rejection.
pub fn build_app(state: AppState, config: &ServiceConfig) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(student_routes(state))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.cors))
}
