pub mod domain;
mod infrastructure;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Seed file field names

pub const NEW_VERSION_FIELD_NAME: &str = "newVersion";
pub const SCHEDULED_DATE_FIELD_NAME: &str = "scheduledDate";
pub const DEACTIVATED_DATE_FIELD_NAME: &str = "deactivatedDate";
pub const DEACTIVATION_REASON_FIELD_NAME: &str = "deactivationReason";

// expose domain module

pub use domain::*;
pub use infrastructure::seed::load as load_registry_seed;
