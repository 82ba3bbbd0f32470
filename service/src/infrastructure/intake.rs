use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{AbortHandle, Abortable};
use tokio::sync::RwLock;

use crate::domain::claims::{
    ClaimForm, ExtractedReceipt, IntakeError, IntakeId, IntakeSession, ReceiptExtractor,
    ReceiptFile, ReceiptIntake,
};

struct SessionSlot {
    session: IntakeSession,
    /// Set while an extraction runs for this session
    extraction: Option<AbortHandle>,
}

type Sessions = Arc<RwLock<HashMap<IntakeId, SessionSlot>>>;

/// Intake sessions kept in process memory.
///
/// Extraction runs in its own task behind an abort handle, so discarding a
/// session stops the extractor and a late answer never lands anywhere.
/// A session leaves the map once its claim is submitted or it is discarded.
#[derive(Clone)]
pub struct InMemoryReceiptIntake<E: ReceiptExtractor> {
    sessions: Sessions,
    extractor: E,
}

impl<E: ReceiptExtractor> InMemoryReceiptIntake<E> {
    pub fn new(extractor: E) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            extractor,
        }
    }

    fn spawn_extraction(&self, id: IntakeId, receipt: ReceiptFile) -> AbortHandle {
        let (handle, registration) = AbortHandle::new_pair();
        let sessions = self.sessions.clone();
        let extractor = self.extractor.clone();

        tokio::spawn(async move {
            match Abortable::new(extractor.extract(receipt), registration).await {
                Ok(outcome) => finish_extraction(&sessions, id, outcome).await,
                Err(_aborted) => tracing::debug!(session = %id, "receipt extraction aborted"),
            }
        });

        handle
    }
}

async fn finish_extraction(
    sessions: &Sessions,
    id: IntakeId,
    outcome: Result<ExtractedReceipt, anyhow::Error>,
) {
    let mut sessions = sessions.write().await;
    let Some(slot) = sessions.get_mut(&id) else {
        tracing::debug!(session = %id, "dropping extraction result of a discarded session");
        return;
    };

    if let Err(error) = &outcome {
        tracing::warn!(session = %id, "receipt extraction failed: {:#}", error);
    }
    if slot.session.finish_extraction(outcome) {
        slot.extraction = None;
    }
}

impl<E: ReceiptExtractor> ReceiptIntake for InMemoryReceiptIntake<E> {
    async fn upload(&self, receipt: ReceiptFile, extract: bool, now: DateTime<Utc>) -> IntakeSession {
        let session = IntakeSession::new(&receipt, extract, now);
        let id = session.id;

        // the slot goes in before the task starts so the answer always finds it
        let mut sessions = self.sessions.write().await;
        let extraction = extract.then(|| self.spawn_extraction(id, receipt));
        sessions.insert(
            id,
            SessionSlot {
                session: session.clone(),
                extraction,
            },
        );

        tracing::info!(session = %id, file_name = %session.file_name, extract, "receipt uploaded");
        session
    }

    async fn get(&self, id: IntakeId) -> Option<IntakeSession> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|slot| slot.session.clone())
    }

    async fn cancel(&self, id: IntakeId) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(slot) => {
                if let Some(extraction) = slot.extraction {
                    extraction.abort();
                }
                tracing::info!(session = %id, "receipt session discarded");
                true
            }
            None => false,
        }
    }

    async fn submit(
        &self,
        id: IntakeId,
        form: ClaimForm,
        now: DateTime<Utc>,
    ) -> Result<IntakeSession, IntakeError> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .get_mut(&id)
            .ok_or_else(|| IntakeError::NotFound(id.to_string()))?;

        slot.session.submit(form, now)?;

        let submitted = match sessions.remove(&id) {
            Some(slot) => slot.session,
            None => return Err(IntakeError::NotFound(id.to_string())),
        };
        let form = &submitted.form;
        tracing::info!(
            session = %id,
            provider = %form.provider_name,
            amount = form.amount.unwrap_or_default(),
            category = ?form.category,
            "claim submitted"
        );
        Ok(submitted)
    }
}
