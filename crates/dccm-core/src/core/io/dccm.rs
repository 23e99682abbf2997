use super::traits::CorrelationFile;
use crate::core::models::dataset::{CorrelationDataset, DataType};
use std::io::{self, Read, Write};
use thiserror::Error;
use tracing::debug;

/// Size of the fixed header: `num_slices`, `num_atoms` and `data_type_id`, each a
/// little-endian `u32`.
pub const HEADER_LEN: usize = 12;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Buffer holds {actual} bytes but the header alone requires {HEADER_LEN}")]
    TruncatedHeader { actual: usize },

    #[error("Unsupported data type id {0} (only 1 = float32 is defined)")]
    UnsupportedDataType(u32),

    #[error(
        "Header declares {num_slices} slices of {num_atoms} residues, which does not fit in memory"
    )]
    DimensionOverflow { num_slices: u32, num_atoms: u32 },

    #[error(
        "Body holds {actual} bytes but the header declares {expected} bytes ({num_slices} slices of {num_atoms} residues)"
    )]
    BodyLengthMismatch {
        num_slices: u32,
        num_atoms: u32,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum DccmFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid DCCM data: {0}")]
    Format(#[from] FormatError),
    #[error("Dataset dimension {0} does not fit in the 32-bit header")]
    HeaderOverflow(usize),
}

/// Header fields of a packed DCCM buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DccmHeader {
    pub num_slices: u32,
    pub num_atoms: u32,
    pub data_type: DataType,
}

impl DccmHeader {
    /// Parses and validates the 12-byte header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < HEADER_LEN {
            return Err(FormatError::TruncatedHeader {
                actual: bytes.len(),
            });
        }
        let num_slices = le_u32(bytes, 0);
        let num_atoms = le_u32(bytes, 4);
        let data_type_id = le_u32(bytes, 8);
        let data_type =
            DataType::from_id(data_type_id).ok_or(FormatError::UnsupportedDataType(data_type_id))?;
        Ok(Self {
            num_slices,
            num_atoms,
            data_type,
        })
    }

    /// Expected body size in bytes, or `None` if it overflows `usize`.
    pub fn body_len(&self) -> Option<usize> {
        let n = self.num_atoms as usize;
        n.checked_add(1)
            .and_then(|n1| n.checked_mul(n1))
            .map(|twice| twice / 2)
            .and_then(|per_slice| per_slice.checked_mul(self.num_slices as usize))
            .and_then(|elements| elements.checked_mul(self.data_type.size_in_bytes()))
    }
}

/// Codec for the packed upper-triangular DCCM binary format.
///
/// | offset | size | field |
/// |---|---|---|
/// | 0 | 4 | `num_slices` |
/// | 4 | 4 | `num_atoms` |
/// | 8 | 4 | `data_type_id` (1 = float32) |
/// | 12 | 4 x slices x n(n+1)/2 | packed float32 values, slice-major |
///
/// All integers and floats are little-endian.
pub struct DccmFile;

impl DccmFile {
    /// Decodes a complete in-memory buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when the header is truncated, the data type is not
    /// float32, or the body is not exactly the size the header declares.
    pub fn decode(bytes: &[u8]) -> Result<CorrelationDataset, FormatError> {
        let header = DccmHeader::parse(bytes)?;
        let expected = header.body_len().ok_or(FormatError::DimensionOverflow {
            num_slices: header.num_slices,
            num_atoms: header.num_atoms,
        })?;
        let body = &bytes[HEADER_LEN..];
        if body.len() != expected {
            return Err(FormatError::BodyLengthMismatch {
                num_slices: header.num_slices,
                num_atoms: header.num_atoms,
                expected,
                actual: body.len(),
            });
        }

        let values: Vec<f32> = body
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        let dataset = CorrelationDataset::from_packed(
            header.num_slices as usize,
            header.num_atoms as usize,
            values,
        )
        .map_err(|e| FormatError::BodyLengthMismatch {
            num_slices: header.num_slices,
            num_atoms: header.num_atoms,
            expected: e.expected * 4,
            actual: e.actual * 4,
        })?;

        debug!(
            num_slices = dataset.num_slices(),
            num_atoms = dataset.num_atoms(),
            "Decoded packed DCCM buffer."
        );
        Ok(dataset)
    }

    /// Encodes a dataset into the packed binary format.
    ///
    /// # Errors
    ///
    /// Returns [`DccmFileError::HeaderOverflow`] if a dimension exceeds `u32::MAX`.
    pub fn encode(dataset: &CorrelationDataset) -> Result<Vec<u8>, DccmFileError> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + dataset.values().len() * 4);
        Self::write_to(dataset, &mut bytes)?;
        Ok(bytes)
    }
}

impl CorrelationFile for DccmFile {
    type Error = DccmFileError;

    fn read_from(reader: &mut impl Read) -> Result<CorrelationDataset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::decode(&bytes)?)
    }

    fn write_to(dataset: &CorrelationDataset, writer: &mut impl Write) -> Result<(), Self::Error> {
        let num_slices = header_u32(dataset.num_slices())?;
        let num_atoms = header_u32(dataset.num_atoms())?;

        writer.write_all(&num_slices.to_le_bytes())?;
        writer.write_all(&num_atoms.to_le_bytes())?;
        writer.write_all(&dataset.data_type().id().to_le_bytes())?;
        for value in dataset.values() {
            writer.write_all(&value.to_le_bytes())?;
        }
        Ok(())
    }
}

fn header_u32(dimension: usize) -> Result<u32, DccmFileError> {
    u32::try_from(dimension).map_err(|_| DccmFileError::HeaderOverflow(dimension))
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
