use std::sync::Arc;

use axum::{Router, routing::post};
use http::{HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::upload_url::{create_upload_url, preflight};
use crate::state::AuthorizerState;

pub const ALLOWED_ORIGIN: &str = "*";
pub const ALLOWED_METHODS: &str = "POST,OPTIONS";
pub const ALLOWED_HEADERS: &str = "*";

/// Create the upload authorizer router
///
/// The function answers on any path, as it would behind a function URL or a
/// proxy integration. Every response carries the CORS headers, including
/// errors and `405`s.
pub fn create_upload_router(state: Arc<AuthorizerState>) -> Router {
    let method_router = post(create_upload_url).options(preflight);

    let cors_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOWED_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ));

    Router::new()
        .route("/", method_router.clone())
        .route("/{*path}", method_router)
        .with_state(state)
        .layer(cors_headers)
        .layer(TraceLayer::new_for_http())
}
