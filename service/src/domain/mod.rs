use chrono::{DateTime, Utc};

use crate::domain::claims::{ReceiptIntake, ReceiptPolicy};
use crate::domain::registry::ModuleRegistry;
use crate::domain::release::lifecycle::LifecycleController;

pub mod claims;
pub mod registry;
pub mod release;

//// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type R: ModuleRegistry;
    type I: ReceiptIntake;
    fn registry(&self) -> &Self::R;
    fn lifecycle(&self) -> &LifecycleController;
    fn intake(&self) -> &Self::I;
    fn receipt_policy(&self) -> &ReceiptPolicy;
    fn clock(&self) -> &Clock;
}

/// Source of "now" for every time dependent rule.
/// A frozen clock keeps scheduling windows deterministic in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    frozen_at: Option<DateTime<Utc>>,
}

impl Clock {
    pub fn system() -> Self {
        Self { frozen_at: None }
    }

    pub fn frozen(at: DateTime<Utc>) -> Self {
        Self {
            frozen_at: Some(at),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.frozen_at.unwrap_or_else(Utc::now)
    }
}
