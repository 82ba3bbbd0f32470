use std::future::Future;

use chrono::{DateTime, Utc};

pub mod error;
pub mod form;
pub mod receipt;
pub mod session;

pub use error::IntakeError;
pub use form::{ClaimForm, ExpenseCategory, ExtractedReceipt};
pub use receipt::{ReceiptFile, ReceiptKind, ReceiptPolicy};
pub use session::{IntakeId, IntakeSession, IntakeStatus};

/// Reads claim details off a receipt image or PDF.
/// Stands in for the OCR backend, so implementations may be slow.
pub trait ReceiptExtractor: Clone + Send + Sync + 'static {
    fn extract(
        &self,
        receipt: ReceiptFile,
    ) -> impl Future<Output = Result<ExtractedReceipt, anyhow::Error>> + Send;
}

/// Receipt upload sessions: from an accepted file to a submitted claim.
pub trait ReceiptIntake: Clone + Send + Sync + 'static {
    /// Open a session for an accepted receipt, optionally starting extraction
    fn upload(
        &self,
        receipt: ReceiptFile,
        extract: bool,
        now: DateTime<Utc>,
    ) -> impl Future<Output = IntakeSession> + Send;

    fn get(&self, id: IntakeId) -> impl Future<Output = Option<IntakeSession>> + Send;

    /// Discard a session; a pending extraction is aborted and its result dropped
    fn cancel(&self, id: IntakeId) -> impl Future<Output = bool> + Send;

    /// Submit the claim form; the submitted session is returned and no longer kept
    fn submit(
        &self,
        id: IntakeId,
        form: ClaimForm,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<IntakeSession, IntakeError>> + Send;
}
