//! Library-wide error and result types.

use std::io;

use thiserror::Error;

/// Result alias used throughout bluekit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the decoder can produce.
///
/// Every variant is fatal: a corrupt or misdescribed header cannot be
/// repaired by re-reading, and no partially decoded header is ever returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The first four bytes are not `BLUE`.
    #[error("file is not a blue file")]
    NotABlueFile,
    /// A byte-order tag was neither `IEEE` nor `EEEI`.
    #[error("invalid endianness tag {0:?}")]
    InvalidEndianness([u8; 4]),
    /// The source ended before the fixed header was complete.
    #[error("truncated fixed header")]
    TruncatedHeader,
    /// The source ended before the declared extended header size.
    #[error("truncated extended header: expected {expected} bytes, found {found}")]
    TruncatedExtendedHeader { expected: u32, found: usize },
    /// An extended header record carried an unsupported type discriminator.
    #[error("unknown keyword type {code:#04x} at offset {offset}")]
    UnknownKeywordType { offset: usize, code: u8 },
    /// An extended header record's lengths are inconsistent.
    #[error("malformed record at offset {offset}: {reason}")]
    MalformedRecord { offset: usize, reason: &'static str },
    /// The record walk did not land exactly on the declared end.
    #[error("record at offset {offset} runs past extended header end {size}")]
    TrailingBytes { offset: usize, size: u32 },
    /// The fixed header's keyword length exceeds the keyword blob.
    #[error("keyword length {0} exceeds the fixed keyword area")]
    KeywordLengthOutOfRange(u32),
    /// A fixed keyword entry is not a single `KEY=VALUE` pair (strict mode).
    #[error("malformed fixed keyword {0:?}")]
    MalformedKeyword(String),
    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON rendering failed.
    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
