use log::{debug, trace};

use crate::error::Result;
use crate::model::{Signature, SignatureTable, TensorInfo, TensorShape};
use crate::parser::wire::{WireReader, WireType};

// Field numbers of the consulted message shapes. Any other field is
// skipped by wire type, never rejected.
const META_GRAPH_SIGNATURE_DEF: u64 = 5;
const MAP_ENTRY_KEY: u64 = 1;
const MAP_ENTRY_VALUE: u64 = 2;
const SIGNATURE_DEF_INPUTS: u64 = 1;
const SIGNATURE_DEF_OUTPUTS: u64 = 2;
const TENSOR_INFO_NAME: u64 = 1;
const TENSOR_INFO_DTYPE: u64 = 2;
const TENSOR_INFO_SHAPE: u64 = 3;
const SHAPE_DIM: u64 = 2;
const SHAPE_UNKNOWN_RANK: u64 = 3;
const DIM_SIZE: u64 = 1;

/// Failure policy of the decoding walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Keep partially decoded records when the input is truncated or uses an
    /// unsupported construct; no error surfaces from the decode path
    #[default]
    Lenient,
    /// Fail fast on the first truncated, malformed, or unsupported construct
    Strict,
}

/// Extracts signature metadata from a serialized MetaGraphDef blob
pub struct SignatureExtractor {
    mode: DecodeMode,
}

impl SignatureExtractor {
    /// Create an extractor with the lenient failure policy
    pub fn new() -> Self {
        Self::with_mode(DecodeMode::Lenient)
    }

    pub fn with_mode(mode: DecodeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Decode the signature map of one serialized metadata blob.
    ///
    /// A blob without any signature entries yields an empty table.
    pub fn extract(&self, data: &[u8]) -> Result<SignatureTable> {
        let mut table = SignatureTable::new();
        let walked = self.walk_root(data, &mut table);
        let table = self.settle(walked, table)?;
        debug!("decoded {} signature(s)", table.len());
        Ok(table)
    }

    fn walk_root(&self, data: &[u8], table: &mut SignatureTable) -> Result<()> {
        let mut reader = WireReader::new(data);
        while !reader.at_end() {
            let tag = reader.read_tag()?;
            match (tag.field, tag.wire_type) {
                (META_GRAPH_SIGNATURE_DEF, WireType::LengthDelimited) => {
                    let entry = reader.read_delimited()?;
                    let decoded =
                        self.decode_map_entry(entry, |value| self.decode_signature_def(value))?;
                    if let Some((key, mut signature)) = decoded {
                        trace!("decoded signature entry {:?}", key);
                        signature.key = key;
                        table.insert(signature);
                    }
                }
                _ => reader.skip(tag)?,
            }
        }
        Ok(())
    }

    /// Decode one synthetic map-entry message into its key and decoded value.
    ///
    /// Entries with an empty key or empty value bytes are dropped.
    fn decode_map_entry<T>(
        &self,
        data: &[u8],
        decode_value: impl Fn(&[u8]) -> Result<T>,
    ) -> Result<Option<(String, T)>> {
        let mut key = String::new();
        let mut value: &[u8] = &[];
        let walked = self.walk_map_entry(data, &mut key, &mut value);
        let (key, value) = self.settle(walked, (key, value))?;
        if key.is_empty() || value.is_empty() {
            return Ok(None);
        }
        Ok(Some((key, decode_value(value)?)))
    }

    fn walk_map_entry<'a>(
        &self,
        data: &'a [u8],
        key: &mut String,
        value: &mut &'a [u8],
    ) -> Result<()> {
        let mut reader = WireReader::new(data);
        while !reader.at_end() {
            let tag = reader.read_tag()?;
            match (tag.field, tag.wire_type) {
                (MAP_ENTRY_KEY, WireType::LengthDelimited) => *key = reader.read_string()?,
                (MAP_ENTRY_VALUE, WireType::LengthDelimited) => *value = reader.read_delimited()?,
                _ => reader.skip(tag)?,
            }
        }
        Ok(())
    }

    fn decode_signature_def(&self, data: &[u8]) -> Result<Signature> {
        let mut signature = Signature::default();
        let walked = self.walk_signature_def(data, &mut signature);
        self.settle(walked, signature)
    }

    fn walk_signature_def(&self, data: &[u8], signature: &mut Signature) -> Result<()> {
        let mut reader = WireReader::new(data);
        while !reader.at_end() {
            let tag = reader.read_tag()?;
            match (tag.field, tag.wire_type) {
                (SIGNATURE_DEF_INPUTS, WireType::LengthDelimited) => {
                    let entry = reader.read_delimited()?;
                    let decoded =
                        self.decode_map_entry(entry, |value| self.decode_tensor_info(value))?;
                    if let Some((alias, info)) = decoded {
                        signature.inputs.insert(alias, info);
                    }
                }
                (SIGNATURE_DEF_OUTPUTS, WireType::LengthDelimited) => {
                    let entry = reader.read_delimited()?;
                    let decoded =
                        self.decode_map_entry(entry, |value| self.decode_tensor_info(value))?;
                    if let Some((alias, info)) = decoded {
                        signature.outputs.insert(alias, info);
                    }
                }
                _ => reader.skip(tag)?,
            }
        }
        Ok(())
    }

    fn decode_tensor_info(&self, data: &[u8]) -> Result<TensorInfo> {
        let mut info = TensorInfo::default();
        let walked = self.walk_tensor_info(data, &mut info);
        self.settle(walked, info)
    }

    fn walk_tensor_info(&self, data: &[u8], info: &mut TensorInfo) -> Result<()> {
        let mut reader = WireReader::new(data);
        while !reader.at_end() {
            let tag = reader.read_tag()?;
            match (tag.field, tag.wire_type) {
                (TENSOR_INFO_NAME, WireType::LengthDelimited) => {
                    info.name = reader.read_string()?;
                }
                (TENSOR_INFO_DTYPE, WireType::Varint) => {
                    info.dtype = reader.read_varint()? as i32;
                }
                (TENSOR_INFO_SHAPE, WireType::LengthDelimited) => {
                    info.shape = self.decode_shape(reader.read_delimited()?)?;
                }
                _ => reader.skip(tag)?,
            }
        }
        Ok(())
    }

    fn decode_shape(&self, data: &[u8]) -> Result<TensorShape> {
        let mut shape = TensorShape::default();
        let walked = self.walk_shape(data, &mut shape);
        self.settle(walked, shape)
    }

    fn walk_shape(&self, data: &[u8], shape: &mut TensorShape) -> Result<()> {
        let mut reader = WireReader::new(data);
        while !reader.at_end() {
            let tag = reader.read_tag()?;
            match (tag.field, tag.wire_type) {
                (SHAPE_DIM, WireType::LengthDelimited) => {
                    let dim = reader.read_delimited()?;
                    shape.dims.push(self.decode_dim_size(dim)?);
                }
                (SHAPE_UNKNOWN_RANK, WireType::Varint) => {
                    shape.unknown_rank = reader.read_varint()? != 0;
                }
                _ => reader.skip(tag)?,
            }
        }
        Ok(())
    }

    /// Decode one Dim submessage to its size field.
    ///
    /// Sizes are int64 on the wire: the unsigned accumulator is reinterpreted
    /// as two's complement, so -1 ("size unknown") decodes from its ten-byte
    /// varint form.
    fn decode_dim_size(&self, data: &[u8]) -> Result<i64> {
        let mut size = 0i64;
        let walked = self.walk_dim(data, &mut size);
        self.settle(walked, size)
    }

    fn walk_dim(&self, data: &[u8], size: &mut i64) -> Result<()> {
        let mut reader = WireReader::new(data);
        while !reader.at_end() {
            let tag = reader.read_tag()?;
            match (tag.field, tag.wire_type) {
                (DIM_SIZE, WireType::Varint) => *size = reader.read_varint()? as i64,
                _ => reader.skip(tag)?,
            }
        }
        Ok(())
    }

    /// Apply the failure policy to one finished message walk: lenient mode
    /// keeps whatever was decoded before the fault, strict mode propagates it
    fn settle<T>(&self, walked: Result<()>, partial: T) -> Result<T> {
        match walked {
            Ok(()) => Ok(partial),
            Err(err) if self.mode == DecodeMode::Lenient => {
                trace!("lenient decode kept partial result: {}", err);
                Ok(partial)
            }
            Err(err) => Err(err),
        }
    }
}

/// Decode signatures from metadata bytes with the default lenient policy
pub fn extract_signatures(data: &[u8]) -> Result<SignatureTable> {
    SignatureExtractor::new().extract(data)
}
