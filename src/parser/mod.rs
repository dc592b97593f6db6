pub mod wire;
pub mod signature;
pub mod metadata_loader;

// Re-export key types from the parser module
pub use signature::{extract_signatures, DecodeMode, SignatureExtractor};
pub use metadata_loader::MetadataLoader;
