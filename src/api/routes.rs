use axum::{http::Method, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors),
        )
}

/// Routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handlers::search_content))
        // Details
        .route("/movie/:id", get(handlers::get_movie))
        .route("/tv/:id", get(handlers::get_tv))
        .route("/content/:id", get(handlers::get_content))
        // Browsing
        .route("/popular/movies", get(handlers::popular_movies))
        .route("/popular/tv", get(handlers::popular_tv))
        .route("/trending", get(handlers::trending))
        // Streaming availability
        .route("/korean-ott", get(handlers::korean_ott))
}
