//! chroma-lambda
//!
//! HTTP surface of the palette service: generation, per-user history, and
//! health, behind permissive CORS for a separately hosted frontend.

pub mod config;
pub mod error;
pub mod generate;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::http::{HeaderValue, Method, header};
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use state::AppState;

const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";

/// Build the application router.
///
/// `CorsLayer` only lists methods and headers on preflight responses; the
/// two header layers add them to every other response as well.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/generate", post(routes::generate::generate_palette))
        .route("/api/history", get(routes::history::list_history))
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::method_not_allowed)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        ))
        .layer(cors)
        .with_state(state)
}
