use benefits_common::{
    DeactivationReason, DeactivationReasonError, ModuleVersion, ModuleVersionPatch, ReleaseNote,
    ReleaseState,
};
use chrono::{DateTime, Utc};

use crate::domain::release::error::LifecycleError;
use crate::domain::release::schedule::ScheduleWindow;

pub const DEFAULT_SCHEDULE_WINDOW_DAYS: u32 = 14;

/// Outcome of one lifecycle change: the entry that replaces the original
/// and, for activation and deactivation, the entry appended after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub updated: ModuleVersion,
    pub appended: Option<ModuleVersion>,
}

/// Validates and computes the user-triggered release transitions.
///
/// ```text
///   available ──schedule──▶ scheduled
///   available | scheduled ──activate──▶ current   (+ appended current copy)
///   current | available | scheduled ──deactivate──▶ deactivated
///                                      (+ appended current at patch + 1)
/// ```
///
/// Every method is pure: it reads the entry and returns the new state,
/// the registry applies it.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleController {
    schedule_window_days: u32,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEDULE_WINDOW_DAYS)
    }
}

impl LifecycleController {
    pub fn new(schedule_window_days: u32) -> Self {
        Self {
            schedule_window_days,
        }
    }

    /// Plan the activation of an available candidate at `at`
    pub fn schedule(
        &self,
        entry: &ModuleVersion,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Transition, LifecycleError> {
        let new_version = match &entry.state {
            ReleaseState::Available { new_version } => new_version,
            ReleaseState::Deactivated { .. } => {
                return Err(LifecycleError::Deactivated(entry.id.to_string()));
            }
            state => {
                return Err(LifecycleError::NotAllowed {
                    status: state.status(),
                    action: "scheduled",
                });
            }
        };

        ScheduleWindow::new(entry.release_date, self.schedule_window_days).check(at, now)?;

        let mut updated = entry.clone();
        updated.state = ReleaseState::Scheduled {
            new_version: new_version.clone(),
            scheduled_date: at,
        };

        Ok(Transition {
            updated,
            appended: None,
        })
    }

    /// Promote the candidate version to current right away
    pub fn activate(&self, entry: &ModuleVersion) -> Result<Transition, LifecycleError> {
        let new_version = match &entry.state {
            ReleaseState::Available { new_version }
            | ReleaseState::Scheduled { new_version, .. } => new_version,
            ReleaseState::Current => {
                return Err(LifecycleError::NotAllowed {
                    status: entry.status(),
                    action: "activated",
                });
            }
            ReleaseState::Deactivated { .. } => {
                return Err(LifecycleError::Deactivated(entry.id.to_string()));
            }
        };

        let mut updated = entry.clone();
        updated.current_version = new_version.clone();
        updated.current_version_notes = entry.new_version_notes.clone();
        updated.new_version_notes = ReleaseNote::default();
        updated.state = ReleaseState::Current;

        // the history keeps a second current entry for the activated version
        let appended = updated.duplicate();

        Ok(Transition {
            updated,
            appended: Some(appended),
        })
    }

    /// Take the module's entry out of service; the module continues at the next patch version
    pub fn deactivate(
        &self,
        entry: &ModuleVersion,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Transition, LifecycleError> {
        if let ReleaseState::Deactivated { .. } = entry.state {
            return Err(LifecycleError::Deactivated(entry.id.to_string()));
        }

        let reason = DeactivationReason::try_new(reason).map_err(|error| match error {
            DeactivationReasonError::NotEmptyViolated => LifecycleError::MissingReason,
            _ => LifecycleError::ReasonTooLong,
        })?;

        let next_version = entry
            .current_version
            .next_patch()
            .map_err(|_| LifecycleError::VersionExhausted(entry.current_version.to_string()))?;

        let mut updated = entry.clone();
        updated.state = ReleaseState::Deactivated {
            deactivated_date: now,
            reason,
        };

        let mut appended = entry.duplicate();
        appended.current_version = next_version;
        appended.release_date = now.date_naive();
        appended.new_version_notes = ReleaseNote::default();
        appended.state = ReleaseState::Current;

        Ok(Transition {
            updated,
            appended: Some(appended),
        })
    }
}

/// Display edits that would move a scheduled entry's window out from under
/// its scheduled date are refused.
pub fn check_patch(entry: &ModuleVersion, patch: &ModuleVersionPatch) -> Result<(), LifecycleError> {
    match (&entry.state, patch.release_date) {
        (ReleaseState::Scheduled { .. }, Some(release_date)) if release_date != entry.release_date => {
            Err(LifecycleError::NotAllowed {
                status: entry.status(),
                action: "moved to another release date",
            })
        }
        _ => Ok(()),
    }
}
