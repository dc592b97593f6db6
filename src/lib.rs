pub mod parser;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use model::{parse_tensor_name, Signature, SignatureTable, TensorInfo, TensorShape};
pub use error::{Error, Result};
pub use parser::{extract_signatures, DecodeMode, MetadataLoader, SignatureExtractor};
