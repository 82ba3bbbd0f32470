use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::claims::error::IntakeError;
use crate::domain::claims::form::{ClaimForm, ExtractedReceipt};
use crate::domain::claims::receipt::{ReceiptFile, ReceiptKind};

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntakeId(pub Uuid);

impl IntakeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl TryFrom<&str> for IntakeId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(value)?;
        Ok(Self(uuid))
    }
}

impl fmt::Display for IntakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    /// Form is filled in by hand
    Ready,
    /// Waiting for the extractor
    Extracting,
    /// Form pre-filled from the extraction
    Extracted,
    /// Extraction failed, form is filled in by hand
    Failed,
    Submitted,
}

/// One receipt on its way to a claim.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeSession {
    pub id: IntakeId,
    pub file_name: String,
    pub kind: ReceiptKind,
    pub size_bytes: usize,
    pub status: IntakeStatus,
    pub extracted: Option<ExtractedReceipt>,
    pub form: ClaimForm,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl IntakeSession {
    pub fn new(receipt: &ReceiptFile, extract: bool, now: DateTime<Utc>) -> Self {
        Self {
            id: IntakeId::generate(),
            file_name: receipt.file_name.clone(),
            kind: receipt.kind,
            size_bytes: receipt.size_bytes(),
            status: if extract {
                IntakeStatus::Extracting
            } else {
                IntakeStatus::Ready
            },
            extracted: None,
            form: ClaimForm::default(),
            error: None,
            created_at: now,
            submitted_at: None,
        }
    }

    /// Store the extractor's answer. Returns false, leaving the session
    /// untouched, when the session no longer waits for one.
    pub fn finish_extraction(&mut self, outcome: Result<ExtractedReceipt, anyhow::Error>) -> bool {
        if self.status != IntakeStatus::Extracting {
            return false;
        }

        match outcome {
            Ok(extracted) => {
                self.form = ClaimForm::from(&extracted);
                self.extracted = Some(extracted);
                self.status = IntakeStatus::Extracted;
            }
            Err(error) => {
                self.error = Some(error.to_string());
                self.status = IntakeStatus::Failed;
            }
        }
        true
    }

    pub fn submit(&mut self, form: ClaimForm, now: DateTime<Utc>) -> Result<(), IntakeError> {
        match self.status {
            IntakeStatus::Extracting => return Err(IntakeError::ExtractionPending),
            IntakeStatus::Submitted => return Err(IntakeError::AlreadySubmitted),
            IntakeStatus::Ready | IntakeStatus::Extracted | IntakeStatus::Failed => {}
        }

        form.validate(now.date_naive())?;

        self.form = form;
        self.status = IntakeStatus::Submitted;
        self.submitted_at = Some(now);
        Ok(())
    }
}
