use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::claims::{
    ClaimForm, ExpenseCategory, ExtractedReceipt, IntakeSession, IntakeStatus,
};

#[derive(Debug, Clone, Serialize)]
pub struct OneSessionResponse {
    data: IntakeSessionResponse,
}

impl From<&IntakeSession> for OneSessionResponse {
    fn from(value: &IntakeSession) -> Self {
        Self {
            data: IntakeSessionResponse::from(value),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeSessionResponse {
    id: String,
    file_name: String,
    content_type: &'static str,
    size_bytes: usize,
    status: IntakeStatus,
    extracted: Option<ExtractedReceiptResponse>,
    form: ClaimFormBody,
    error: Option<String>,
    created_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl From<&IntakeSession> for IntakeSessionResponse {
    fn from(value: &IntakeSession) -> Self {
        Self {
            id: value.id.to_string(),
            file_name: value.file_name.clone(),
            content_type: value.kind.mime(),
            size_bytes: value.size_bytes,
            status: value.status,
            extracted: value.extracted.as_ref().map(ExtractedReceiptResponse::from),
            form: ClaimFormBody::from(&value.form),
            error: value.error.clone(),
            created_at: value.created_at,
            submitted_at: value.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedReceiptResponse {
    provider_name: String,
    service_date: NaiveDate,
    amount: f64,
    category: ExpenseCategory,
    description: String,
    confidence: f32,
}

impl From<&ExtractedReceipt> for ExtractedReceiptResponse {
    fn from(value: &ExtractedReceipt) -> Self {
        Self {
            provider_name: value.provider_name.clone(),
            service_date: value.service_date,
            amount: value.amount,
            category: value.category,
            description: value.description.clone(),
            confidence: value.confidence,
        }
    }
}

/// The claim form as the client edits and submits it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimFormBody {
    provider_name: String,
    service_date: Option<NaiveDate>,
    amount: Option<f64>,
    category: ExpenseCategory,
    description: String,
}

impl From<&ClaimForm> for ClaimFormBody {
    fn from(value: &ClaimForm) -> Self {
        Self {
            provider_name: value.provider_name.clone(),
            service_date: value.service_date,
            amount: value.amount,
            category: value.category,
            description: value.description.clone(),
        }
    }
}

impl From<ClaimFormBody> for ClaimForm {
    fn from(value: ClaimFormBody) -> Self {
        Self {
            provider_name: value.provider_name.trim().to_string(),
            service_date: value.service_date,
            amount: value.amount,
            category: value.category,
            description: value.description.trim().to_string(),
        }
    }
}
