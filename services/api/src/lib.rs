pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use error::ApiError;
use state::AppState;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

/// Builds the application router with all routes and middleware attached.
pub fn app(state: AppState) -> Router {
    // Permissive CORS so a separately hosted frontend can call the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/", get(routes::index))
        .route("/api/login", post(routes::login))
        .route("/api/logout", post(routes::logout))
        .route("/api/session", get(routes::session_info))
        .route("/api/process-speech", post(routes::process_speech))
        .route("/api/process-text", post(routes::process_text))
        .route("/api/detect-sign", post(routes::detect_sign))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .with_state(state)
}

/// Turns a handler panic into the same JSON 500 as any other internal error.
fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };
    ApiError::Internal(message).into_response()
}
