use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum_prometheus::PrometheusMetricLayer;

use tokio::net;
use crate::domain::AppState;
use crate::infrastructure::http::handlers::claims::{
    discard_session, find_session_by_id, submit_claim, upload_receipt,
};
use crate::infrastructure::http::handlers::releases::{
    activate_release, create_release, deactivate_release, find_release_by_id, list_releases,
    release_history, release_notes, schedule_release, update_release,
};
use crate::infrastructure::http::handlers::{fallback, health_check, service_index};

mod api;
mod handlers;
mod json;
mod querystring;

#[cfg(test)]
mod tests;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
    /// Request body limit, must leave room for the multipart framing around a receipt
    pub max_body_bytes: usize,
}

/// The application's HTTP server. The underlying HTTP package is opaque to module consumers.
pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(state: impl AppState, config: HttpServerConfig<'_>) -> anyhow::Result<Self> {
        let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
            |request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("http_request", method = ?request.method(), uri)
            },
        );
        // see: https://github.com/metrics-rs/metrics
        // see: https://github.com/Ptrskay3/axum-prometheus
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let router = router(state, config.max_body_bytes)
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(trace_layer)
            .layer(prometheus_layer);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server until Ctrl-C.
    pub async fn run(self) -> anyhow::Result<()> {
        let address = self
            .listener
            .local_addr()
            .context("listener has no local address")?;
        tracing::info!("listening on {}", address);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", error);
        return;
    }
    tracing::info!("shutdown signal received");
}

/// Routes without the metrics and tracing layers.
pub fn router<S: AppState>(state: S, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(service_index))
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

fn api_routes<S: AppState>() -> Router<S> {
    Router::new()
        .route("/releases", get(list_releases::<S>).post(create_release::<S>))
        .route("/releases/history", get(release_history::<S>))
        .route(
            "/releases/{id}",
            get(find_release_by_id::<S>).patch(update_release::<S>),
        )
        .route("/releases/{id}/schedule", post(schedule_release::<S>))
        .route("/releases/{id}/activate", post(activate_release::<S>))
        .route("/releases/{id}/deactivate", post(deactivate_release::<S>))
        .route("/releases/{id}/notes/{version}", get(release_notes::<S>))
        .route("/claims/receipts", post(upload_receipt::<S>))
        .route(
            "/claims/receipts/{id}",
            get(find_session_by_id::<S>).delete(discard_session::<S>),
        )
        .route("/claims/receipts/{id}/submit", post(submit_claim::<S>))
}
