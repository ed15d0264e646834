//! HTTP surface: certificate verification, PNG preview and PDF download.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ServiceError;
pub use handlers::CertificateView;
pub use state::{AppState, build_store};

use axum::{BoxError, Router, error_handling::HandleErrorLayer, response::IntoResponse, routing::get};
use std::time::Duration;
use tower::ServiceBuilder;

pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let api_routes = Router::new()
        .route("/api/v1/certificates/:id", get(handlers::verify_certificate))
        .route(
            "/api/v1/certificates/:id/preview.png",
            get(handlers::preview_certificate),
        )
        .route(
            "/api/v1/certificates/:id/download",
            get(handlers::download_certificate),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(timeout),
        )
        .with_state(state)
}

async fn handle_middleware_error(error: BoxError) -> impl IntoResponse {
    if error.is::<tower::timeout::error::Elapsed>() {
        ServiceError::Timeout
    } else {
        ServiceError::Internal(error.to_string())
    }
}
