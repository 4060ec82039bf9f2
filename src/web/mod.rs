pub mod routes;
pub mod state;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/sentiment/health", get(routes::health))
        .route("/api/v1/sentiment/{subfeddit}", get(routes::analyze))
        .route("/api/v1/sentiment/{subfeddit}/history", get(routes::history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
