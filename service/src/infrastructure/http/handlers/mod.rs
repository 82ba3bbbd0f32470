use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use crate::infrastructure::http::api::{ApiError, ApiSuccess};

pub mod claims;
pub mod releases;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    name: &'static str,
    version: &'static str,
    api: &'static [&'static str],
}

// root of the service, lists the api sections
pub async fn service_index() -> ApiSuccess<ServiceDescriptor> {
    ApiSuccess::new(
        StatusCode::OK,
        ServiceDescriptor {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            api: &["/api/releases", "/api/releases/history", "/api/claims/receipts"],
        },
    )
}

/// Unknown api routes are reported, everything else goes back to the root.
pub async fn fallback(OriginalUri(uri): OriginalUri) -> Response {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        ApiError::NotFound(format!("no route for {}", path)).into_response()
    } else {
        Redirect::to("/").into_response()
    }
}
