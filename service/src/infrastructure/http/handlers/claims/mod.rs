use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;

use crate::domain::AppState;
use crate::domain::claims::{IntakeError, IntakeId, ReceiptIntake};
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::json::JsonBody;
use crate::infrastructure::http::handlers::claims::dto::{ClaimFormBody, OneSessionResponse};

mod dto;

const FILE_FIELD: &str = "file";
const EXTRACT_FIELD: &str = "extract";

/// Raw multipart upload before the receipt policy has looked at it
#[derive(Debug, Default)]
struct Upload {
    file: Option<(String, String, Vec<u8>)>,
    extract: bool,
}

pub async fn upload_receipt<S: AppState>(
    State(state): State<S>,
    multipart: Multipart,
) -> Result<ApiSuccess<OneSessionResponse>, ApiError> {
    let policy = state.receipt_policy();
    let upload = read_upload(multipart, policy.max_size_bytes()).await?;

    let (file_name, content_type, bytes) = upload.file.ok_or(IntakeError::MissingFile)?;
    let receipt = policy.accept(&file_name, &content_type, bytes)?;

    let session = state
        .intake()
        .upload(receipt, upload.extract, state.clock().now())
        .await;

    Ok(ApiSuccess::new(StatusCode::CREATED, OneSessionResponse::from(&session)))
}

async fn read_upload(mut multipart: Multipart, limit_bytes: usize) -> Result<Upload, ApiError> {
    let too_large = |error: MultipartError| -> ApiError {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            IntakeError::FileTooLarge {
                size_bytes: limit_bytes + 1,
                limit_bytes,
            }
            .into()
        } else {
            ApiError::UnprocessableEntity(error.body_text())
        }
    };

    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await.map_err(too_large)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(too_large)?;
                upload.file = Some((file_name, content_type, bytes.to_vec()));
            }
            EXTRACT_FIELD => {
                let value = field.text().await.map_err(too_large)?;
                upload.extract = matches!(value.trim(), "true" | "1" | "on");
            }
            other => tracing::debug!(field = other, "ignoring multipart field"),
        }
    }
    Ok(upload)
}

pub async fn find_session_by_id<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<OneSessionResponse>, ApiError> {
    let id = parse_id(&id)?;

    state
        .intake()
        .get(id)
        .await
        .map(|session| ApiSuccess::new(StatusCode::OK, OneSessionResponse::from(&session)))
        .ok_or_else(|| IntakeError::NotFound(id.to_string()).into())
}

pub async fn discard_session<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    if state.intake().cancel(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(IntakeError::NotFound(id.to_string()).into())
    }
}

pub async fn submit_claim<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    JsonBody(body): JsonBody<ClaimFormBody>,
) -> Result<ApiSuccess<OneSessionResponse>, ApiError> {
    let id = parse_id(&id)?;

    let session = state
        .intake()
        .submit(id, body.into(), state.clock().now())
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, OneSessionResponse::from(&session)))
}

fn parse_id(id: &str) -> Result<IntakeId, ApiError> {
    // malformed ids can never name a session
    IntakeId::try_from(id).map_err(|_| IntakeError::NotFound(id.to_string()).into())
}
