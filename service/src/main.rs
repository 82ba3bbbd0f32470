use std::time::Duration;

use benefits_common::load_registry_seed;
use crate::domain::Clock;
use crate::domain::claims::ReceiptPolicy;
use crate::domain::release::lifecycle::LifecycleController;
use crate::infrastructure::AppStateImpl;
use crate::infrastructure::extraction::SimulatedReceiptExtractor;
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::intake::InMemoryReceiptIntake;
use crate::infrastructure::registry::InMemoryModuleRegistry;
use crate::infrastructure::scheduler;
use crate::infrastructure::settings::Settings;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod domain;
mod infrastructure;

// room for the multipart framing around a receipt of maximum size
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let seed = load_registry_seed(&settings.seed_path)?;
    tracing::info!(entries = seed.len(), "module registry seeded");

    let receipt_policy = ReceiptPolicy::new(settings.receipts.max_size_bytes);
    let extractor = SimulatedReceiptExtractor::new(Duration::from_millis(
        settings.receipts.extraction_delay_ms,
    ));

    let state = AppStateImpl::new(
        InMemoryModuleRegistry::new(seed),
        InMemoryReceiptIntake::new(extractor),
        LifecycleController::new(settings.releases.schedule_window_days),
        receipt_policy,
        Clock::system(),
    );

    let sweep = match settings.releases.sweep_interval_seconds {
        0 => None,
        seconds => Some(scheduler::spawn(state.clone(), Duration::from_secs(seconds))),
    };

    let server_config = HttpServerConfig {
        port: &settings.server_port,
        max_body_bytes: settings.receipts.max_size_bytes + MULTIPART_OVERHEAD_BYTES,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    let result = http_server.run().await;

    if let Some(sweep) = sweep {
        sweep.abort();
    }
    result
}
