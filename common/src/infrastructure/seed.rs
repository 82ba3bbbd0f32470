use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow, ensure};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::{
    DeactivationReason, ModuleName, ModuleStatus, ModuleVersion, ModuleVersionId, ReleaseNote,
    ReleaseState, VersionNumber,
};
use crate::{
    DEACTIVATED_DATE_FIELD_NAME, DEACTIVATION_REASON_FIELD_NAME, NEW_VERSION_FIELD_NAME,
    SCHEDULED_DATE_FIELD_NAME,
};

/// Load the registry seed from every `*.json` file of `seed_path`.
///
/// Files are read in name order and each holds an array of entries, so the
/// returned order is stable between starts. Entries without an `id` get a
/// generated one.
pub fn load(seed_path: &str) -> Result<Vec<ModuleVersion>, anyhow::Error> {
    let dir_path = Path::new(seed_path);

    tracing::debug!("Loading registry seed from {}", dir_path.to_string_lossy());

    let entries = fs::read_dir(dir_path).with_context(|| {
        format!(
            "failed to read registry seed directory: {}",
            dir_path.to_string_lossy()
        )
    })?;

    let mut files = Vec::new();
    for entry_res in entries {
        let entry = entry_res.map_err(|e| anyhow!("failed to read a directory entry: {}", e))?;
        let path = entry.path();
        if path.is_file() && is_json(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut modules = Vec::new();
    let mut ids = HashSet::new();
    for path in files {
        for module in load_file(&path)? {
            ensure!(
                ids.insert(module.id.clone()),
                "duplicate registry id '{}' in '{}'",
                module.id,
                path.to_string_lossy()
            );
            modules.push(module);
        }
    }

    Ok(modules)
}

fn load_file(path: &Path) -> Result<Vec<ModuleVersion>, anyhow::Error> {
    let path_str = path.to_string_lossy().into_owned();

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read registry seed file '{}'", path_str))?;

    let records = serde_json::from_str::<Vec<ModuleVersionRecord>>(&content)
        .with_context(|| format!("failed to parse JSON registry seed '{}'", path_str))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            ModuleVersion::try_from(record)
                .with_context(|| format!("invalid entry #{} in '{}'", index, path_str))
        })
        .collect()
}

fn is_json(path: &Path) -> bool {
    path.extension().map(|ext| ext == "json").unwrap_or(false)
}

// internal struct for Deserializing, flat as the portal serves it

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleVersionRecord {
    id: Option<String>,
    module_name: String,
    current_version: String,
    new_version: Option<String>,
    release_date: NaiveDate,
    status: ModuleStatus,
    scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    current_version_notes: ReleaseNote,
    #[serde(default)]
    new_version_notes: ReleaseNote,
    is_active: Option<bool>,
    deactivated_date: Option<DateTime<Utc>>,
    deactivation_reason: Option<String>,
}

impl TryFrom<ModuleVersionRecord> for ModuleVersion {
    type Error = anyhow::Error;

    fn try_from(record: ModuleVersionRecord) -> Result<Self, Self::Error> {
        let id = match record.id {
            Some(id) => ModuleVersionId::try_from(id)?,
            None => ModuleVersionId::generate(),
        };
        let module_name = ModuleName::try_new(record.module_name)?;
        let current_version = VersionNumber::try_new(record.current_version)?;
        let new_version = record.new_version.map(VersionNumber::try_new).transpose()?;

        let status = record.status;
        if status != ModuleStatus::Scheduled {
            ensure_absent(record.scheduled_date.is_some(), SCHEDULED_DATE_FIELD_NAME, status)?;
        }
        if status != ModuleStatus::Deactivated {
            ensure_absent(record.deactivated_date.is_some(), DEACTIVATED_DATE_FIELD_NAME, status)?;
            ensure_absent(
                record.deactivation_reason.is_some(),
                DEACTIVATION_REASON_FIELD_NAME,
                status,
            )?;
        }
        if let Some(is_active) = record.is_active {
            ensure!(
                is_active == (status != ModuleStatus::Deactivated),
                "isActive must be {} for a {} module",
                !is_active,
                status
            );
        }

        let state = match status {
            ModuleStatus::Current => {
                ensure_absent(new_version.is_some(), NEW_VERSION_FIELD_NAME, status)?;
                ReleaseState::Current
            }
            ModuleStatus::Available => ReleaseState::Available {
                new_version: required(new_version, NEW_VERSION_FIELD_NAME, status)?,
            },
            ModuleStatus::Scheduled => ReleaseState::Scheduled {
                new_version: required(new_version, NEW_VERSION_FIELD_NAME, status)?,
                scheduled_date: required(record.scheduled_date, SCHEDULED_DATE_FIELD_NAME, status)?,
            },
            ModuleStatus::Deactivated => {
                ensure_absent(new_version.is_some(), NEW_VERSION_FIELD_NAME, status)?;
                let reason =
                    required(record.deactivation_reason, DEACTIVATION_REASON_FIELD_NAME, status)?;
                ReleaseState::Deactivated {
                    deactivated_date: required(
                        record.deactivated_date,
                        DEACTIVATED_DATE_FIELD_NAME,
                        status,
                    )?,
                    reason: DeactivationReason::try_new(reason)?,
                }
            }
        };

        Ok(ModuleVersion {
            id,
            module_name,
            current_version,
            release_date: record.release_date,
            current_version_notes: record.current_version_notes,
            new_version_notes: record.new_version_notes,
            state,
        })
    }
}

fn required<T>(value: Option<T>, field: &str, status: ModuleStatus) -> Result<T, anyhow::Error> {
    value.ok_or_else(|| anyhow!("{} is required for a {} module", field, status))
}

fn ensure_absent(present: bool, field: &str, status: ModuleStatus) -> Result<(), anyhow::Error> {
    ensure!(!present, "{} must not be set for a {} module", field, status);
    Ok(())
}
