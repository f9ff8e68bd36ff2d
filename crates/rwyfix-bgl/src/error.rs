//! Error types for BGL decoding and patching.

use thiserror::Error;

/// Errors that can occur while decoding or patching a BGL container.
#[derive(Debug, Error)]
pub enum Error {
    /// Byte-source error (truncated read, span outside the stream).
    #[error(transparent)]
    Source(#[from] rwyfix_common::Error),

    /// A record or subrecord declares a length below the 6-byte prefix.
    ///
    /// A zero-length record would stall the subrecord cursor forever, so any
    /// declared length below the prefix size is rejected outright.
    #[error("record at {offset:#x} declares length {declared}, below the 6-byte prefix")]
    RecordTooShort { offset: u64, declared: u32 },

    /// Reserved base-38 symbol value 1 encountered in an identifier.
    #[error("invalid base-38 identifier symbol value {0}")]
    InvalidIdentSymbol(u64),

    /// A string field contains invalid UTF-8.
    #[error("invalid string bytes: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Unrecognized start-type nibble.
    #[error("unknown start type {0:#x}")]
    UnknownStartType(u8),

    /// Unrecognized ILS/VOR type byte.
    #[error("unknown ILS/VOR type {0:#x}")]
    UnknownIlsVorType(u8),

    /// A runway-number token outside {1..36} and the compass tokens.
    #[error("invalid runway number {0:?}")]
    InvalidRunwayNumber(String),

    /// A runway-designator token outside {'', L, R, C, W, A, B}.
    #[error("invalid runway designator {0:?}")]
    InvalidRunwayDesignator(String),

    /// The field's codec has no encoder, so it cannot be patched.
    #[error("field codec {0} does not support re-encoding")]
    Unpatchable(&'static str),

    /// Decode failure with record and field context attached.
    #[error("{record}.{field} at {offset:#x}: {source}")]
    Field {
        record: &'static str,
        field: &'static str,
        offset: u64,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach record/field context to a decode error.
    pub(crate) fn in_field(self, record: &'static str, field: &'static str, offset: u64) -> Self {
        Error::Field {
            record,
            field,
            offset,
            source: Box::new(self),
        }
    }

    /// Whether this error is structural and must abort the whole container,
    /// as opposed to a decode error that only drops the enclosing record.
    pub fn is_structural(&self) -> bool {
        match self {
            Error::Source(_) | Error::RecordTooShort { .. } => true,
            Error::Field { source, .. } => source.is_structural(),
            _ => false,
        }
    }
}

/// Result type for BGL operations.
pub type Result<T> = std::result::Result<T, Error>;
