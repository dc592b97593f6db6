use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Shape of a tensor as recorded in the graph metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorShape {
    /// Dimension sizes in declaration order; -1 marks a dimension of unknown size
    pub dims: Vec<i64>,
    /// True when the producer declared the whole rank unknown
    pub unknown_rank: bool,
}

impl TensorShape {
    /// Create a fully known shape from a list of dimension sizes
    pub fn known(dims: Vec<i64>) -> Self {
        TensorShape {
            dims,
            unknown_rank: false,
        }
    }

    /// Number of dimensions, or None when the rank itself is unknown
    pub fn rank(&self) -> Option<usize> {
        if self.unknown_rank {
            None
        } else {
            Some(self.dims.len())
        }
    }
}

/// Descriptor of one tensor endpoint: name, type code, shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TensorInfo {
    /// Name of the underlying graph tensor, e.g. "serving_default_input:0"
    pub name: String,
    /// Numeric type code from the producer's type system; 0 means unset
    pub dtype: i32,
    pub shape: TensorShape,
}

/// A named entry point of the computation graph with its input/output tensors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// The signature's own name, matching its key in the table
    pub key: String,
    /// Alias name to tensor descriptor, for tensors the caller feeds
    pub inputs: HashMap<String, TensorInfo>,
    /// Alias name to tensor descriptor, for tensors the caller fetches
    pub outputs: HashMap<String, TensorInfo>,
}

impl Signature {
    /// Look up an input tensor by its alias name
    pub fn input(&self, alias: &str) -> Option<&TensorInfo> {
        self.inputs.get(alias)
    }

    /// Look up an output tensor by its alias name
    pub fn output(&self, alias: &str) -> Option<&TensorInfo> {
        self.outputs.get(alias)
    }
}

/// The decoded signature map of one graph metadata blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignatureTable {
    signatures: HashMap<String, Signature>,
}

impl SignatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signature under its key, replacing any previous entry
    pub fn insert(&mut self, signature: Signature) {
        self.signatures.insert(signature.key.clone(), signature);
    }

    pub fn get(&self, key: &str) -> Option<&Signature> {
        self.signatures.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.signatures.contains_key(key)
    }

    /// Look up a signature, failing explicitly when it is absent
    pub fn require(&self, key: &str) -> Result<&Signature> {
        self.signatures
            .get(key)
            .ok_or_else(|| Error::SignatureNotFound(key.to_string()))
    }

    /// Names of all decoded signatures, in no particular order
    pub fn names(&self) -> Vec<&str> {
        self.signatures.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Signature)> {
        self.signatures.iter()
    }

    /// Serialize the table as pretty-printed JSON for tooling and reports
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }
}

/// Split a tensor name of the form "operation:index" into its parts.
///
/// Names without an index suffix refer to output 0 of the operation.
pub fn parse_tensor_name(name: &str) -> (&str, i32) {
    match name.rsplit_once(':') {
        Some((op, index)) => match index.parse::<i32>() {
            Ok(index) => (op, index),
            Err(_) => (name, 0),
        },
        None => (name, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tensor_names_with_and_without_index() {
        assert_eq!(parse_tensor_name("input:0"), ("input", 0));
        assert_eq!(parse_tensor_name("StatefulPartitionedCall:2"), ("StatefulPartitionedCall", 2));
        assert_eq!(parse_tensor_name("input"), ("input", 0));
        assert_eq!(parse_tensor_name("input:"), ("input:", 0));
    }

    #[test]
    fn shape_rank_distinguishes_unknown_rank_from_scalar() {
        assert_eq!(TensorShape::known(vec![1, 10]).rank(), Some(2));
        assert_eq!(TensorShape::known(vec![]).rank(), Some(0));

        let unknown = TensorShape {
            dims: vec![],
            unknown_rank: true,
        };
        assert_eq!(unknown.rank(), None);
    }

    #[test]
    fn table_insert_uses_the_signature_key() {
        let mut table = SignatureTable::new();
        table.insert(Signature {
            key: "serving_default".to_string(),
            ..Signature::default()
        });

        assert!(table.contains("serving_default"));
        assert_eq!(table.names(), vec!["serving_default"]);
        assert!(table.require("missing").is_err());
    }
}
