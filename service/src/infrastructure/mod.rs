use crate::{
    domain::{AppState, Clock, claims::ReceiptPolicy, release::lifecycle::LifecycleController},
    infrastructure::{
        extraction::SimulatedReceiptExtractor, intake::InMemoryReceiptIntake,
        registry::InMemoryModuleRegistry,
    },
};

pub mod extraction;
pub mod http;
pub mod intake;
pub mod registry;
pub mod scheduler;
pub mod settings;

#[derive(Clone)]
pub struct AppStateImpl {
    registry: InMemoryModuleRegistry,
    intake: InMemoryReceiptIntake<SimulatedReceiptExtractor>,
    lifecycle: LifecycleController,
    receipt_policy: ReceiptPolicy,
    clock: Clock,
}

impl AppStateImpl {
    pub fn new(
        registry: InMemoryModuleRegistry,
        intake: InMemoryReceiptIntake<SimulatedReceiptExtractor>,
        lifecycle: LifecycleController,
        receipt_policy: ReceiptPolicy,
        clock: Clock,
    ) -> Self {
        Self {
            registry,
            intake,
            lifecycle,
            receipt_policy,
            clock,
        }
    }

    #[cfg(test)]
    pub fn in_memory(seed: Vec<benefits_common::ModuleVersion>, clock: Clock) -> Self {
        Self::new(
            InMemoryModuleRegistry::new(seed),
            InMemoryReceiptIntake::new(SimulatedReceiptExtractor::new(
                std::time::Duration::from_millis(1),
            )),
            LifecycleController::default(),
            ReceiptPolicy::default(),
            clock,
        )
    }

    #[cfg(test)]
    pub fn with_receipt_policy(mut self, receipt_policy: ReceiptPolicy) -> Self {
        self.receipt_policy = receipt_policy;
        self
    }
}

impl AppState for AppStateImpl {
    type R = InMemoryModuleRegistry;
    type I = InMemoryReceiptIntake<SimulatedReceiptExtractor>;

    fn registry(&self) -> &Self::R {
        &self.registry
    }

    fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    fn intake(&self) -> &Self::I {
        &self.intake
    }

    fn receipt_policy(&self) -> &ReceiptPolicy {
        &self.receipt_policy
    }

    fn clock(&self) -> &Clock {
        &self.clock
    }
}
