use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::model::SignatureTable;
use crate::parser::signature::SignatureExtractor;

/// Loads serialized graph metadata from disk and extracts its signatures.
///
/// Graph construction, session lifetime, and execution belong to the layer
/// consuming the decoded table; this loader only turns a file into bytes and
/// bytes into signatures.
pub struct MetadataLoader;

impl MetadataLoader {
    /// Read a serialized metadata file and decode its signature table
    pub fn load_signatures(path: &Path) -> Result<SignatureTable> {
        let buffer = Self::read_metadata_bytes(path)?;
        debug!(
            "read {} metadata bytes from {}",
            buffer.len(),
            path.display()
        );
        SignatureExtractor::new().extract(&buffer)
    }

    /// Read the raw bytes of a serialized metadata blob
    pub fn read_metadata_bytes(path: &Path) -> Result<Vec<u8>> {
        let mut file = File::open(path).map_err(|e| {
            Error::MetadataLoadError(path.to_path_buf(), format!("Failed to open file: {}", e))
        })?;

        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).map_err(|e| {
            Error::MetadataLoadError(path.to_path_buf(), format!("Failed to read file: {}", e))
        })?;

        Ok(buffer)
    }
}
