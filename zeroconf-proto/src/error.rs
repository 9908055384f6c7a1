//! Custom error type definitions.

use thiserror::Error;

use crate::RecordType;

/// Errors that may arise during parsing.
///
/// Any of these aborts the parse of the whole message; no partially filled
/// [`Response`](crate::Response) is ever returned.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Received truncated message: a field needs more bytes than remain.")]
    TruncatedMessage,

    #[error("Malformed name: invalid compression pointer at offset {0}.")]
    MalformedName(usize),

    #[error("Invalid label type: must be 192 (i.e. pointer) or 0, is {0}.")]
    InvalidLabelType(u8),

    #[error("Invalid name length: must be smaller than 256, is {0}.")]
    NameTooLong(usize),

    #[error("Invalid label length in name: must be smaller than 64, is {0}.")]
    LabelTooLong(usize),

    #[error("Invalid name: contains an empty label.")]
    EmptyLabel,

    #[error("Invalid NSEC type bitmap length in window {window}: must be 1 to 32, is {length}.")]
    InvalidTypeBitmap { window: u8, length: u8 },

    #[error("RDATA of {rtype} record is {rdlength} bytes long, but {consumed} bytes were decoded.")]
    RdlengthMismatch {
        rtype: RecordType,
        rdlength: u16,
        consumed: usize,
    },
}

/// Errors that may arise during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Invalid field value: {0}.")]
    InvalidFieldValue(String),

    #[error("Domain name too long: allowed are up to 255 bytes, got {0}.")]
    DomainTooLong(usize),

    #[error("Label too long: allowed are up to 63 bytes, got {0}.")]
    LabelTooLong(usize),

    #[error("Character string too long: allowed are up to 255 bytes, got {0}.")]
    StringTooLong(usize),

    #[error("RDATA too long: allowed are up to 65535 bytes, got {0}.")]
    RdataTooLong(usize),

    #[error("Too many entries in one section: allowed are up to 65535, got {0}.")]
    TooManyEntries(usize),

    #[error("IO error.")]
    IoError(#[from] std::io::Error),
}
