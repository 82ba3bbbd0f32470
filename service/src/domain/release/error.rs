use benefits_common::ModuleStatus;

/// Reasons a registry entry refuses a lifecycle change.
/// The message is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("module version '{0}' not found")]
    NotFound(String),

    #[error("Please select both date and time")]
    MissingSchedule,

    #[error("Invalid {field} '{value}'")]
    MalformedSchedule { field: &'static str, value: String },

    #[error("Scheduled time must be in the future")]
    ScheduleInPast,

    #[error("Scheduled time must be within {window_days} days of the release date")]
    ScheduleBeyondWindow { window_days: u32 },

    #[error("Please provide a reason for deactivation")]
    MissingReason,

    #[error("Deactivation reason must not exceed 500 characters")]
    ReasonTooLong,

    #[error("a {status} module cannot be {action}")]
    NotAllowed {
        status: ModuleStatus,
        action: &'static str,
    },

    #[error("module version '{0}' is deactivated and can no longer change")]
    Deactivated(String),

    #[error("cannot derive a patch release after version {0}")]
    VersionExhausted(String),
}
