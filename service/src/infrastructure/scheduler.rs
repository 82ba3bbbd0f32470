use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::registry::ModuleRegistry;
use crate::domain::release::error::LifecycleError;
use crate::domain::release::lifecycle::Transition;
use crate::domain::AppState;

/// Periodically activates scheduled releases whose time has come.
pub fn spawn<S: AppState>(state: S, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            activate_due(&state).await;
        }
    })
}

/// One sweep over the registry
pub async fn activate_due<S: AppState>(state: &S) -> Vec<Transition> {
    let now = state.clock().now();
    let due = state
        .registry()
        .list()
        .await
        .into_iter()
        .filter(|entry| entry.is_due(now))
        .map(|entry| entry.id)
        .collect::<Vec<_>>();

    let mut activated = Vec::new();
    for id in due {
        let lifecycle = state.lifecycle();
        // the entry may have changed since listing, so due-ness is checked again under the lock
        let result = state
            .registry()
            .transition(&id, |entry| {
                if entry.is_due(now) {
                    lifecycle.activate(entry)
                } else {
                    Err(LifecycleError::NotAllowed {
                        status: entry.status(),
                        action: "activated by the scheduler",
                    })
                }
            })
            .await;

        match result {
            Ok(transition) => {
                tracing::info!(
                    id = %id,
                    module = %transition.updated.module_name,
                    version = %transition.updated.current_version,
                    "scheduled release activated"
                );
                activated.push(transition);
            }
            Err(error) => tracing::warn!(id = %id, "scheduled activation skipped: {}", error),
        }
    }
    activated
}
