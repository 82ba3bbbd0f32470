use axum::extract::{Path, State};
use axum::http::StatusCode;
use benefits_common::{ModuleStatus, ModuleVersion, ModuleVersionId, ModuleVersionPatch};
use serde::Deserialize;

use crate::domain::AppState;
use crate::domain::registry::ModuleRegistry;
use crate::domain::release::lifecycle::Transition;
use crate::domain::release::{notes, schedule::parse_schedule};
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::releases::dto::{
    CreateReleaseRequest, DeactivateRequest, HistoryResponse, ManyReleasesResponse,
    ModuleHistoryResponse, ModuleVersionResponse, NotesResponse, OneReleaseResponse,
    ScheduleRequest, TransitionResponse, UpdateReleaseRequest,
};
use crate::infrastructure::http::json::JsonBody;
use crate::infrastructure::http::querystring::QueryString;

mod dto;

#[derive(Deserialize, Debug, Default)]
pub struct ReleaseFilter {
    pub status: Option<String>,
    /// Module name, matched case-insensitively
    pub module: Option<String>,
}

impl ReleaseFilter {
    fn matcher(&self) -> Result<impl Fn(&ModuleVersion) -> bool, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ModuleStatus>)
            .transpose()
            .map_err(|err| ApiError::UnprocessableEntity(err.to_string()))?;
        let module = self.module.as_deref().map(|m| m.trim().to_lowercase());

        Ok(move |entry: &ModuleVersion| {
            status.is_none_or(|status| entry.status() == status)
                && module
                    .as_deref()
                    .is_none_or(|module| entry.module_name.to_string().to_lowercase() == module)
        })
    }
}

pub async fn list_releases<S: AppState>(
    QueryString(filter): QueryString<ReleaseFilter>,
    State(state): State<S>,
) -> Result<ApiSuccess<ManyReleasesResponse>, ApiError> {
    let matches = filter.matcher()?;

    let data = state
        .registry()
        .list()
        .await
        .iter()
        .filter(|&entry| matches(entry))
        .map(ModuleVersionResponse::from)
        .collect::<Vec<_>>();

    Ok(ApiSuccess::new(StatusCode::OK, ManyReleasesResponse::from(data)))
}

pub async fn release_history<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<HistoryResponse>, ApiError> {
    use itertools::Itertools;

    let entries = state.registry().list().await;

    // groups keep the order in which module names first appear
    let names = entries
        .iter()
        .map(|entry| entry.module_name.to_string())
        .unique()
        .collect::<Vec<_>>();
    let mut groups = entries
        .iter()
        .into_group_map_by(|entry| entry.module_name.to_string());

    let data = names
        .into_iter()
        .filter_map(|name| {
            let versions = groups.remove(&name)?;
            let versions = versions
                .into_iter()
                .map(ModuleVersionResponse::from)
                .collect::<Vec<_>>();
            Some(ModuleHistoryResponse::from((name, versions)))
        })
        .collect();

    Ok(ApiSuccess::new(StatusCode::OK, HistoryResponse { data }))
}

pub async fn find_release_by_id<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<OneReleaseResponse>, ApiError> {
    let id = parse_id(id)?;

    state
        .registry()
        .get(&id)
        .await
        .map(|entry| ApiSuccess::new(StatusCode::OK, OneReleaseResponse::from(&entry)))
        .ok_or_else(|| not_found(&id))
}

pub async fn create_release<S: AppState>(
    State(state): State<S>,
    JsonBody(body): JsonBody<CreateReleaseRequest>,
) -> Result<ApiSuccess<OneReleaseResponse>, ApiError> {
    let entry = ModuleVersion::try_from(body)?;

    state.registry().append(entry.clone()).await;
    tracing::info!(id = %entry.id, module = %entry.module_name, "module release created");

    Ok(ApiSuccess::new(StatusCode::CREATED, OneReleaseResponse::from(&entry)))
}

pub async fn update_release<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    JsonBody(body): JsonBody<UpdateReleaseRequest>,
) -> Result<ApiSuccess<OneReleaseResponse>, ApiError> {
    let id = parse_id(id)?;
    let patch = ModuleVersionPatch::try_from(body)?;
    if patch.is_empty() {
        return Err(ApiError::UnprocessableEntity("Nothing to update".to_string()));
    }

    state
        .registry()
        .update(&id, patch)
        .await?
        .map(|entry| ApiSuccess::new(StatusCode::OK, OneReleaseResponse::from(&entry)))
        .ok_or_else(|| not_found(&id))
}

pub async fn schedule_release<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    JsonBody(body): JsonBody<ScheduleRequest>,
) -> Result<ApiSuccess<TransitionResponse>, ApiError> {
    let id = parse_id(id)?;
    let at = parse_schedule(body.date.as_deref(), body.time.as_deref())?;
    let now = state.clock().now();
    let lifecycle = state.lifecycle();

    let transition = state
        .registry()
        .transition(&id, |entry| lifecycle.schedule(entry, at, now))
        .await?;

    log_transition("module release scheduled", &transition);
    Ok(ApiSuccess::new(StatusCode::OK, TransitionResponse::from(&transition)))
}

pub async fn activate_release<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<TransitionResponse>, ApiError> {
    let id = parse_id(id)?;
    let lifecycle = state.lifecycle();

    let transition = state
        .registry()
        .transition(&id, |entry| lifecycle.activate(entry))
        .await?;

    log_transition("module release activated", &transition);
    Ok(ApiSuccess::new(StatusCode::OK, TransitionResponse::from(&transition)))
}

pub async fn deactivate_release<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    JsonBody(body): JsonBody<DeactivateRequest>,
) -> Result<ApiSuccess<TransitionResponse>, ApiError> {
    let id = parse_id(id)?;
    let now = state.clock().now();
    let lifecycle = state.lifecycle();

    let transition = state
        .registry()
        .transition(&id, |entry| lifecycle.deactivate(entry, &body.reason, now))
        .await?;

    log_transition("module release deactivated", &transition);
    Ok(ApiSuccess::new(StatusCode::OK, TransitionResponse::from(&transition)))
}

pub async fn release_notes<S: AppState>(
    Path((id, version)): Path<(String, String)>,
    State(state): State<S>,
) -> Result<ApiSuccess<NotesResponse>, ApiError> {
    let id = parse_id(id)?;
    let entry = state.registry().get(&id).await.ok_or_else(|| not_found(&id))?;

    notes::render(&entry, &version)
        .map(|rendered| ApiSuccess::new(StatusCode::OK, NotesResponse::from(rendered)))
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "no release notes for version '{}' of {}",
                version, entry.module_name
            ))
        })
}

fn parse_id(id: String) -> Result<ModuleVersionId, ApiError> {
    ModuleVersionId::try_from(id).map_err(|err| ApiError::UnprocessableEntity(err.to_string()))
}

fn not_found(id: &ModuleVersionId) -> ApiError {
    ApiError::NotFound(format!("module version '{}' not found", id))
}

fn log_transition(message: &str, transition: &Transition) {
    let updated = &transition.updated;
    tracing::info!(
        id = %updated.id,
        module = %updated.module_name,
        version = %updated.current_version,
        status = %updated.status(),
        appended = ?transition.appended.as_ref().map(|entry| entry.id.to_string()),
        "{}",
        message
    );
}
