use axum::http::StatusCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::claims::IntakeError;
use crate::domain::release::error::LifecycleError;

// ApiSucess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

// ApiError is a wrapper around a response that includes a status code.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    ConflictWithServerState(String),
    NotFound(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(format!("{:#}", e))
    }
}

impl From<LifecycleError> for ApiError {
    fn from(value: LifecycleError) -> Self {
        use LifecycleError::*;

        let message = value.to_string();
        match value {
            NotFound(_) => Self::NotFound(message),
            NotAllowed { .. } | Deactivated(_) => Self::ConflictWithServerState(message),
            VersionExhausted(_) => Self::InternalServerError(message),
            MissingSchedule
            | MalformedSchedule { .. }
            | ScheduleInPast
            | ScheduleBeyondWindow { .. }
            | MissingReason
            | ReasonTooLong => Self::UnprocessableEntity(message),
        }
    }
}

impl From<IntakeError> for ApiError {
    fn from(value: IntakeError) -> Self {
        use IntakeError::*;

        let message = value.to_string();
        match value {
            NotFound(_) => Self::NotFound(message),
            ExtractionPending | AlreadySubmitted => Self::ConflictWithServerState(message),
            UnsupportedFileType(_)
            | FileTooLarge { .. }
            | MissingFile
            | EmptyFile
            | InvalidClaim(_) => Self::UnprocessableEntity(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        match self {
            InternalServerError(e) => {
                tracing::error!("{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponseBody::new_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )),
                )
                    .into_response()
            }
            UnprocessableEntity(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponseBody::new_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    message,
                )),
            )
                .into_response(),
            ConflictWithServerState(message) => (
                StatusCode::CONFLICT,
                Json(ApiResponseBody::new_error(StatusCode::CONFLICT, message)),
            )
                .into_response(),
            NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponseBody::new_error(StatusCode::NOT_FOUND, message)),
            )
                .into_response(),
        }
    }
}

// Generic response structure shared by all API responses.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    pub status_code: u16,
    pub data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

/// The response data format for all error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use benefits_common::ModuleStatus;

    #[test]
    fn lifecycle_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(LifecycleError::MissingReason),
            ApiError::UnprocessableEntity("Please provide a reason for deactivation".to_string())
        );
        assert!(matches!(
            ApiError::from(LifecycleError::NotAllowed {
                status: ModuleStatus::Current,
                action: "activated",
            }),
            ApiError::ConflictWithServerState(_)
        ));
        assert!(matches!(
            ApiError::from(LifecycleError::NotFound("x".to_string())),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn intake_errors_map_to_statuses() {
        assert!(matches!(
            ApiError::from(IntakeError::ExtractionPending),
            ApiError::ConflictWithServerState(_)
        ));
        assert_eq!(
            ApiError::from(IntakeError::InvalidClaim("Provider name is required")),
            ApiError::UnprocessableEntity("Provider name is required".to_string())
        );
    }
}
