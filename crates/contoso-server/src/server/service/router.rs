use super::{handler, state::AppState};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::service_info))
        .route("/health", get(handler::health))
        // Lookups
        .route("/users", get(handler::list_users))
        .route("/user/profile", get(handler::user_profile))
        .route("/account/balance", post(handler::account_balance))
        // Streaming
        .route("/stream", get(handler::stream))
        .route("/generate_stream", get(handler::generate_stream))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
