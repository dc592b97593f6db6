use thiserror::Error;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Truncated message: {0}")]
    Truncated(String),

    #[error("Unsupported wire type {wire_type} on field {field}")]
    UnsupportedWireType { field: u64, wire_type: u8 },

    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Failed to load metadata from {0}: {1}")]
    MetadataLoadError(PathBuf, String),

    #[error("Signature not found: {0}")]
    SignatureNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
