use std::time::Duration;

use chrono::{Days, Utc};

use crate::domain::claims::{ExpenseCategory, ExtractedReceipt, ReceiptExtractor, ReceiptFile};

/// Stand-in for the OCR backend: answers with fixed claim details after a delay.
#[derive(Clone, Debug)]
pub struct SimulatedReceiptExtractor {
    delay: Duration,
}

impl SimulatedReceiptExtractor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl ReceiptExtractor for SimulatedReceiptExtractor {
    async fn extract(&self, receipt: ReceiptFile) -> Result<ExtractedReceipt, anyhow::Error> {
        tracing::debug!(
            file_name = %receipt.file_name,
            kind = receipt.kind.mime(),
            size_bytes = receipt.size_bytes(),
            "extracting receipt"
        );
        tokio::time::sleep(self.delay).await;

        let today = Utc::now().date_naive();
        Ok(ExtractedReceipt {
            provider_name: "Lakeside Family Medicine".to_string(),
            service_date: today.checked_sub_days(Days::new(3)).unwrap_or(today),
            amount: 125.0,
            category: ExpenseCategory::Medical,
            description: "Office visit".to_string(),
            confidence: 0.92,
        })
    }
}
