use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::claims::error::IntakeError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    #[default]
    Medical,
    Dental,
    Vision,
    Pharmacy,
    Other,
}

/// Claim details read off a receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedReceipt {
    pub provider_name: String,
    pub service_date: NaiveDate,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: String,
    /// 0.0 - 1.0
    pub confidence: f32,
}

/// The editable claim form, pre-filled from extraction when there is one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimForm {
    pub provider_name: String,
    pub service_date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub category: ExpenseCategory,
    pub description: String,
}

impl From<&ExtractedReceipt> for ClaimForm {
    fn from(value: &ExtractedReceipt) -> Self {
        Self {
            provider_name: value.provider_name.clone(),
            service_date: Some(value.service_date),
            amount: Some(value.amount),
            category: value.category,
            description: value.description.clone(),
        }
    }
}

impl ClaimForm {
    pub fn validate(&self, today: NaiveDate) -> Result<(), IntakeError> {
        if self.provider_name.trim().is_empty() {
            return Err(IntakeError::InvalidClaim("Provider name is required"));
        }
        match self.service_date {
            None => return Err(IntakeError::InvalidClaim("Service date is required")),
            Some(date) if date > today => {
                return Err(IntakeError::InvalidClaim("Service date cannot be in the future"));
            }
            Some(_) => {}
        }
        match self.amount {
            Some(amount) if amount.is_finite() && amount > 0.0 => Ok(()),
            _ => Err(IntakeError::InvalidClaim("Amount must be greater than zero")),
        }
    }
}
