use serde::Serialize;

use crate::domain::claims::error::IntakeError;

pub const DEFAULT_MAX_RECEIPT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    Jpeg,
    Png,
    Heic,
    Pdf,
}

impl ReceiptKind {
    /// Kind for a MIME type, parameters such as `; name=...` ignored
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/jpeg" => Some(ReceiptKind::Jpeg),
            "image/png" => Some(ReceiptKind::Png),
            "image/heic" => Some(ReceiptKind::Heic),
            "application/pdf" => Some(ReceiptKind::Pdf),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ReceiptKind::Jpeg => "image/jpeg",
            ReceiptKind::Png => "image/png",
            ReceiptKind::Heic => "image/heic",
            ReceiptKind::Pdf => "application/pdf",
        }
    }
}

/// An uploaded receipt that passed the type and size checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    pub file_name: String,
    pub kind: ReceiptKind,
    pub bytes: Vec<u8>,
}

impl ReceiptFile {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Admission rules for uploaded receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    max_size_bytes: usize,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECEIPT_BYTES)
    }
}

impl ReceiptPolicy {
    pub fn new(max_size_bytes: usize) -> Self {
        Self { max_size_bytes }
    }

    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    pub fn accept(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ReceiptFile, IntakeError> {
        let kind = ReceiptKind::from_mime(content_type)
            .ok_or_else(|| IntakeError::UnsupportedFileType(content_type.to_string()))?;

        if bytes.len() > self.max_size_bytes {
            return Err(IntakeError::FileTooLarge {
                size_bytes: bytes.len(),
                limit_bytes: self.max_size_bytes,
            });
        }
        if bytes.is_empty() {
            return Err(IntakeError::EmptyFile);
        }

        Ok(ReceiptFile {
            file_name: file_name.trim().to_string(),
            kind,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_types() {
        let policy = ReceiptPolicy::default();

        for (mime, kind) in [
            ("image/jpeg", ReceiptKind::Jpeg),
            ("image/png", ReceiptKind::Png),
            ("IMAGE/HEIC", ReceiptKind::Heic),
            ("application/pdf; name=receipt.pdf", ReceiptKind::Pdf),
        ] {
            let receipt = policy.accept("receipt", mime, vec![1, 2, 3]).unwrap();
            assert_eq!(receipt.kind, kind);
            assert_eq!(receipt.size_bytes(), 3);
        }
    }

    #[test]
    fn rejects_other_types() {
        let policy = ReceiptPolicy::default();

        for mime in ["text/plain", "image/gif", "application/zip", ""] {
            assert_eq!(
                policy.accept("receipt", mime, vec![1]).unwrap_err(),
                IntakeError::UnsupportedFileType(mime.to_string())
            );
        }
    }

    #[test]
    fn enforces_size_limit() {
        let policy = ReceiptPolicy::default();
        let at_limit = vec![0u8; DEFAULT_MAX_RECEIPT_BYTES];
        let over_limit = vec![0u8; DEFAULT_MAX_RECEIPT_BYTES + 1];

        assert!(policy.accept("scan.pdf", "application/pdf", at_limit).is_ok());
        assert_eq!(
            policy.accept("scan.pdf", "application/pdf", over_limit),
            Err(IntakeError::FileTooLarge {
                size_bytes: DEFAULT_MAX_RECEIPT_BYTES + 1,
                limit_bytes: DEFAULT_MAX_RECEIPT_BYTES,
            })
        );
    }

    #[test]
    fn type_is_checked_before_size() {
        let policy = ReceiptPolicy::new(4);

        assert!(matches!(
            policy.accept("notes.txt", "text/plain", vec![0u8; 8]),
            Err(IntakeError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn empty_files_are_rejected() {
        assert_eq!(
            ReceiptPolicy::default().accept("blank.png", "image/png", Vec::new()),
            Err(IntakeError::EmptyFile)
        );
    }
}
