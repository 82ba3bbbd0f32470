use benefits_common::{
    ModuleName, ModuleStatus, ModuleVersion, ModuleVersionId, ModuleVersionPatch, ReleaseNote,
    ReleaseState, VersionNumber,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::release::lifecycle::Transition;
use crate::domain::release::notes::{NoteSection, RenderedNotes};
use crate::infrastructure::http::api::ApiError;

/// Flat view of a registry entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleVersionResponse {
    id: String,
    module_name: String,
    current_version: String,
    new_version: Option<String>,
    release_date: NaiveDate,
    status: ModuleStatus,
    scheduled_date: Option<DateTime<Utc>>,
    current_version_notes: ReleaseNote,
    new_version_notes: ReleaseNote,
    is_active: bool,
    deactivated_date: Option<DateTime<Utc>>,
    deactivation_reason: Option<String>,
}

impl PartialEq for ModuleVersionResponse {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl From<&ModuleVersion> for ModuleVersionResponse {
    fn from(value: &ModuleVersion) -> Self {
        let deactivation = value.deactivation();
        Self {
            id: value.id.to_string(),
            module_name: value.module_name.to_string(),
            current_version: value.current_version.to_string(),
            new_version: value.new_version().map(ToString::to_string),
            release_date: value.release_date,
            status: value.status(),
            scheduled_date: value.scheduled_date(),
            current_version_notes: value.current_version_notes.clone(),
            new_version_notes: value.new_version_notes.clone(),
            is_active: value.is_active(),
            deactivated_date: deactivation.map(|(date, _)| date),
            deactivation_reason: deactivation.map(|(_, reason)| reason.to_string()),
        }
    }
}

/// Response for the list route
#[derive(Debug, Clone, Serialize)]
pub struct ManyReleasesResponse {
    data: Vec<ModuleVersionResponse>,
    meta: MetadataResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataResponse {
    total: usize,
}

impl From<Vec<ModuleVersionResponse>> for ManyReleasesResponse {
    fn from(data: Vec<ModuleVersionResponse>) -> Self {
        let total = data.len();
        Self {
            data,
            meta: MetadataResponse { total },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OneReleaseResponse {
    data: ModuleVersionResponse,
}

impl From<&ModuleVersion> for OneReleaseResponse {
    fn from(value: &ModuleVersion) -> Self {
        Self {
            data: ModuleVersionResponse::from(value),
        }
    }
}

/// Response of schedule, activate and deactivate
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResponse {
    data: ModuleVersionResponse,
    appended: Option<ModuleVersionResponse>,
}

impl From<&Transition> for TransitionResponse {
    fn from(value: &Transition) -> Self {
        Self {
            data: ModuleVersionResponse::from(&value.updated),
            appended: value.appended.as_ref().map(ModuleVersionResponse::from),
        }
    }
}

/// Version history of one module, oldest entry first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleHistoryResponse {
    module_name: String,
    versions: Vec<ModuleVersionResponse>,
}

impl From<(String, Vec<ModuleVersionResponse>)> for ModuleHistoryResponse {
    fn from((module_name, versions): (String, Vec<ModuleVersionResponse>)) -> Self {
        Self {
            module_name,
            versions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<ModuleHistoryResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesResponse {
    module_name: String,
    version: String,
    sections: Vec<NoteSectionResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteSectionResponse {
    title: &'static str,
    items: Vec<String>,
}

impl From<RenderedNotes> for NotesResponse {
    fn from(value: RenderedNotes) -> Self {
        Self {
            module_name: value.module_name,
            version: value.version,
            sections: value
                .sections
                .into_iter()
                .map(|NoteSection { title, items }| NoteSectionResponse { title, items })
                .collect(),
        }
    }
}

// requests

/// Body of the create route. A `newVersion` makes the entry available.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReleaseRequest {
    module_name: String,
    current_version: String,
    new_version: Option<String>,
    release_date: NaiveDate,
    #[serde(default)]
    current_version_notes: ReleaseNote,
    #[serde(default)]
    new_version_notes: ReleaseNote,
}

impl TryFrom<CreateReleaseRequest> for ModuleVersion {
    type Error = ApiError;

    fn try_from(value: CreateReleaseRequest) -> Result<Self, Self::Error> {
        let state = match value.new_version {
            Some(new_version) => ReleaseState::Available {
                new_version: parse_version("newVersion", new_version)?,
            },
            None => ReleaseState::Current,
        };

        Ok(ModuleVersion {
            id: ModuleVersionId::generate(),
            module_name: parse_module_name(value.module_name)?,
            current_version: parse_version("currentVersion", value.current_version)?,
            release_date: value.release_date,
            current_version_notes: value.current_version_notes,
            new_version_notes: value.new_version_notes,
            state,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReleaseRequest {
    module_name: Option<String>,
    release_date: Option<NaiveDate>,
    current_version_notes: Option<ReleaseNote>,
    new_version_notes: Option<ReleaseNote>,
}

impl TryFrom<UpdateReleaseRequest> for ModuleVersionPatch {
    type Error = ApiError;

    fn try_from(value: UpdateReleaseRequest) -> Result<Self, Self::Error> {
        Ok(ModuleVersionPatch {
            module_name: value.module_name.map(parse_module_name).transpose()?,
            release_date: value.release_date,
            current_version_notes: value.current_version_notes,
            new_version_notes: value.new_version_notes,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleRequest {
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeactivateRequest {
    #[serde(default)]
    pub reason: String,
}

fn parse_module_name(value: String) -> Result<ModuleName, ApiError> {
    ModuleName::try_new(value)
        .map_err(|err| ApiError::UnprocessableEntity(format!("moduleName: {}", err)))
}

fn parse_version(field: &str, value: String) -> Result<VersionNumber, ApiError> {
    VersionNumber::try_new(value)
        .map_err(|err| ApiError::UnprocessableEntity(format!("{}: {}", field, err)))
}
