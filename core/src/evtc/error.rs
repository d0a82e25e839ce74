//! Error types for EVTC log reading

use thiserror::Error;

/// Errors during raw EVTC log parsing
#[derive(Debug, Error)]
pub enum LogError {
    #[error("not an EVTC log: bad magic bytes")]
    BadMagic,

    #[error("unsupported EVTC revision {revision} (newest supported: {supported})")]
    UnsupportedVersion { revision: u8, supported: u8 },

    #[error("unexpected end of data at byte offset {offset}")]
    UnexpectedEndOfData { offset: usize },

    #[error("malformed log: {detail}")]
    MalformedLog { detail: String },

    #[error("failed to decompress log archive")]
    Decompression(#[source] zip::result::ZipError),

    #[error("failed to read decompressed payload")]
    DecompressionIo(#[source] std::io::Error),
}

impl LogError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        LogError::MalformedLog {
            detail: detail.into(),
        }
    }
}
