/// Rejections of the receipt intake.
/// The message is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Invalid file type. Please upload a JPEG, PNG, HEIC or PDF file.")]
    UnsupportedFileType(String),

    #[error("File size must be less than {}", format_size(.limit_bytes))]
    FileTooLarge { size_bytes: usize, limit_bytes: usize },

    #[error("Please choose a receipt file")]
    MissingFile,

    #[error("The receipt file is empty")]
    EmptyFile,

    #[error("receipt session '{0}' not found")]
    NotFound(String),

    #[error("Receipt details are still being extracted")]
    ExtractionPending,

    #[error("This claim has already been submitted")]
    AlreadySubmitted,

    #[error("{0}")]
    InvalidClaim(&'static str),
}

fn format_size(bytes: &usize) -> String {
    const MB: usize = 1024 * 1024;
    if *bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_reads_naturally() {
        let error = IntakeError::FileTooLarge {
            size_bytes: 12 * 1024 * 1024,
            limit_bytes: 10 * 1024 * 1024,
        };
        assert_eq!(error.to_string(), "File size must be less than 10MB");

        let error = IntakeError::FileTooLarge {
            size_bytes: 20,
            limit_bytes: 16,
        };
        assert_eq!(error.to_string(), "File size must be less than 16 bytes");
    }
}
