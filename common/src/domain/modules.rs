use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::notes::ReleaseNote;
use crate::domain::version::VersionNumber;

/// One registry entry: a product module together with its current
/// version, an optional candidate version and the lifecycle state.
///
/// Entries are never removed from the registry. Activation and
/// deactivation replace an entry and append a fresh one, so the list of
/// entries sharing a `module_name` reads as the module's version history.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleVersion {
    pub id: ModuleVersionId,
    pub module_name: ModuleName,
    pub current_version: VersionNumber,
    /// Date the candidate version became available
    pub release_date: NaiveDate,
    pub current_version_notes: ReleaseNote,
    pub new_version_notes: ReleaseNote,
    pub state: ReleaseState,
}

/// Lifecycle state with the data that exists only in that state.
#[derive(Clone, Debug, PartialEq)]
pub enum ReleaseState {
    /// Running the current version, nothing pending
    Current,

    /// A candidate version waits for activation
    Available { new_version: VersionNumber },

    /// Candidate activation is planned
    Scheduled {
        new_version: VersionNumber,
        scheduled_date: DateTime<Utc>,
    },

    /// Terminal for this entry, the module continues in a newer one
    Deactivated {
        deactivated_date: DateTime<Utc>,
        reason: DeactivationReason,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Current,
    Available,
    Scheduled,
    Deactivated,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown module status '{0}', expected current, available, scheduled or deactivated")]
pub struct ModuleStatusError(pub String);

/// Opaque identifier of a registry entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleVersionId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("module version id must not be empty")]
pub struct ModuleVersionIdError;

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 80),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct ModuleName(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 500),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Hash, Serialize, Deserialize)
)]
pub struct DeactivationReason(String);

/// Display fields that may change on a live entry.
#[derive(Clone, Debug, Default)]
pub struct ModuleVersionPatch {
    pub module_name: Option<ModuleName>,
    pub release_date: Option<NaiveDate>,
    pub current_version_notes: Option<ReleaseNote>,
    pub new_version_notes: Option<ReleaseNote>,
}

// implementations

impl ModuleVersion {
    pub fn status(&self) -> ModuleStatus {
        self.state.status()
    }

    pub fn new_version(&self) -> Option<&VersionNumber> {
        match &self.state {
            ReleaseState::Available { new_version }
            | ReleaseState::Scheduled { new_version, .. } => Some(new_version),
            ReleaseState::Current | ReleaseState::Deactivated { .. } => None,
        }
    }

    pub fn scheduled_date(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            ReleaseState::Scheduled { scheduled_date, .. } => Some(*scheduled_date),
            _ => None,
        }
    }

    pub fn deactivation(&self) -> Option<(DateTime<Utc>, &DeactivationReason)> {
        match &self.state {
            ReleaseState::Deactivated {
                deactivated_date,
                reason,
            } => Some((*deactivated_date, reason)),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ReleaseState::Deactivated { .. })
    }

    /// Scheduled entry whose activation time has come
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_date().is_some_and(|at| at <= now)
    }

    /// Same content under a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: ModuleVersionId::generate(),
            ..self.clone()
        }
    }

    pub fn apply(&mut self, patch: ModuleVersionPatch) {
        if let Some(module_name) = patch.module_name {
            self.module_name = module_name;
        }
        if let Some(release_date) = patch.release_date {
            self.release_date = release_date;
        }
        if let Some(notes) = patch.current_version_notes {
            self.current_version_notes = notes;
        }
        if let Some(notes) = patch.new_version_notes {
            self.new_version_notes = notes;
        }
    }
}

impl ReleaseState {
    pub fn status(&self) -> ModuleStatus {
        match self {
            ReleaseState::Current => ModuleStatus::Current,
            ReleaseState::Available { .. } => ModuleStatus::Available,
            ReleaseState::Scheduled { .. } => ModuleStatus::Scheduled,
            ReleaseState::Deactivated { .. } => ModuleStatus::Deactivated,
        }
    }
}

impl ModuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Current => "current",
            ModuleStatus::Available => "available",
            ModuleStatus::Scheduled => "scheduled",
            ModuleStatus::Deactivated => "deactivated",
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleStatus {
    type Err = ModuleStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(ModuleStatus::Current),
            "available" => Ok(ModuleStatus::Available),
            "scheduled" => Ok(ModuleStatus::Scheduled),
            "deactivated" => Ok(ModuleStatus::Deactivated),
            _ => Err(ModuleStatusError(value.to_string())),
        }
    }
}

impl ModuleVersionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ModuleVersionId {
    type Error = ModuleVersionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(ModuleVersionIdError)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl TryFrom<&str> for ModuleVersionId {
    type Error = ModuleVersionIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl From<ModuleVersionId> for String {
    fn from(value: ModuleVersionId) -> Self {
        value.0
    }
}

impl ModuleVersionPatch {
    pub fn is_empty(&self) -> bool {
        self.module_name.is_none()
            && self.release_date.is_none()
            && self.current_version_notes.is_none()
            && self.new_version_notes.is_none()
    }
}
