use std::path::Path;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

use crate::routes::error::ApiError;
use crate::state::AppState;

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod extractor;
pub mod kamar;

async fn handle_404() -> ApiError {
    ApiError::not_found("Endpoint tidak ditemukan.")
}

/// Build the router. When `frontend_dir` is set, unknown paths fall through
/// to the static frontend instead of the JSON 404.
pub fn create_app(state: AppState, frontend_dir: Option<&Path>) -> Router {
    // Middleware CORS untuk izinkan request dari frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Auth routes
        .route("/signin", post(auth::signin))
        .route("/signout", post(auth::signout))
        .route("/me", get(auth::me))

        // Ledger routes
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/rooms", get(kamar::get_rooms).post(kamar::create_room))
        .route("/rooms/:room/tenants/:tenant", patch(kamar::update_tenant))
        .route(
            "/rooms/:room/tenants/:tenant/payments",
            post(kamar::create_payment),
        )
        .route(
            "/rooms/:room/tenants/:tenant/payments/:payment",
            patch(kamar::update_payment),
        )

        // Test route
        .route("/hello", get(|| async { "Hello from Axum!" }));

    // Static file untuk frontend, kalau FRONTEND_DIR diisi
    let router = match frontend_dir {
        Some(dir) => {
            info!("Serving frontend from {}", dir.display());
            let serve_dir =
                ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("index.html")));
            router.fallback_service(serve_dir)
        }
        None => router.fallback(handle_404),
    };

    router
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
