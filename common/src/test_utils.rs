use chrono::NaiveDate;

use crate::domain::{
    ModuleName, ModuleVersion, ModuleVersionId, ReleaseNote, ReleaseState, VersionNumber,
};

/// Builders for registry entries.
///
/// Public so that other crates can reuse them for their own tests.
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn version(value: &str) -> VersionNumber {
    VersionNumber::try_new(value).unwrap()
}

pub fn notes(feature: &str) -> ReleaseNote {
    ReleaseNote {
        features: vec![feature.to_string()],
        bug_fixes: Vec::new(),
        improvements: Vec::new(),
    }
}

/// Entry running `current`, nothing pending.
pub fn current_module(name: &str, current: &str, release_date: &str) -> ModuleVersion {
    ModuleVersion {
        id: ModuleVersionId::generate(),
        module_name: ModuleName::try_new(name).unwrap(),
        current_version: version(current),
        release_date: date(release_date),
        current_version_notes: notes(&format!("{name} {current}")),
        new_version_notes: ReleaseNote::default(),
        state: ReleaseState::Current,
    }
}

/// Entry running `current` with `candidate` waiting for activation.
pub fn available_module(
    name: &str,
    current: &str,
    candidate: &str,
    release_date: &str,
) -> ModuleVersion {
    ModuleVersion {
        new_version_notes: notes(&format!("{name} {candidate}")),
        state: ReleaseState::Available {
            new_version: version(candidate),
        },
        ..current_module(name, current, release_date)
    }
}
