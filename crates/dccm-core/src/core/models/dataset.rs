use super::packed;
use nalgebra::DMatrix;
use std::fmt;
use thiserror::Error;

/// Element encodings understood by the packed correlation format.
///
/// Only 32-bit floats are defined; the wire identifier of every other value is
/// rejected by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Float32,
}

impl DataType {
    pub const FLOAT32_ID: u32 = 1;

    pub fn id(self) -> u32 {
        match self {
            DataType::Float32 => Self::FLOAT32_ID,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            Self::FLOAT32_ID => Some(DataType::Float32),
            _ => None,
        }
    }

    pub fn size_in_bytes(self) -> usize {
        match self {
            DataType::Float32 => std::mem::size_of::<f32>(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Float32 => write!(f, "float32"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Slice index {index} is out of range for a dataset with {num_slices} slices")]
    SliceOutOfRange { index: usize, num_slices: usize },

    #[error("Residue index {index} is out of range for a dataset with {num_atoms} residues")]
    ResidueOutOfRange { index: usize, num_atoms: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Dataset declares {num_slices} slices of {num_atoms} residues ({expected} values) but holds {actual} values"
)]
pub struct ShapeError {
    pub num_slices: usize,
    pub num_atoms: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Minimum, maximum and mean over the stored (upper-triangular) values of one slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
}

/// A trajectory of symmetric correlation matrices stored as packed upper triangles.
///
/// Values are laid out slice-major: slice `s` occupies
/// `s * elements_per_slice .. (s + 1) * elements_per_slice` and each slice is ordered
/// by [`packed::offset`]. The struct is immutable once built; a reload replaces the
/// whole value.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationDataset {
    num_slices: usize,
    num_atoms: usize,
    data_type: DataType,
    values: Vec<f32>,
}

impl CorrelationDataset {
    /// Builds a dataset from already-packed values.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] when `values.len()` differs from
    /// `num_slices * num_atoms * (num_atoms + 1) / 2`.
    pub fn from_packed(
        num_slices: usize,
        num_atoms: usize,
        values: Vec<f32>,
    ) -> Result<Self, ShapeError> {
        let expected = packed::elements_per_slice(num_atoms)
            .checked_mul(num_slices)
            .unwrap_or(usize::MAX);
        if values.len() != expected {
            return Err(ShapeError {
                num_slices,
                num_atoms,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            num_slices,
            num_atoms,
            data_type: DataType::Float32,
            values,
        })
    }

    /// Packs the upper triangle of each square matrix into a new dataset.
    ///
    /// Only entries with `i <= j` are read; the lower triangle is assumed to mirror it.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if any matrix is not `num_atoms x num_atoms`, where
    /// `num_atoms` is taken from the first matrix.
    pub fn from_matrices(matrices: &[DMatrix<f64>]) -> Result<Self, ShapeError> {
        let num_atoms = matrices.first().map_or(0, |m| m.nrows());
        let per_slice = packed::elements_per_slice(num_atoms);
        let mut values = Vec::with_capacity(per_slice * matrices.len());

        for matrix in matrices {
            if matrix.nrows() != num_atoms || matrix.ncols() != num_atoms {
                return Err(ShapeError {
                    num_slices: matrices.len(),
                    num_atoms,
                    expected: per_slice,
                    actual: matrix.nrows() * matrix.ncols(),
                });
            }
            for i in 0..num_atoms {
                for j in i..num_atoms {
                    values.push(matrix[(i, j)] as f32);
                }
            }
        }

        Self::from_packed(matrices.len(), num_atoms, values)
    }

    pub fn num_slices(&self) -> usize {
        self.num_slices
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn elements_per_slice(&self) -> usize {
        packed::elements_per_slice(self.num_atoms)
    }

    /// The raw packed values, slice-major.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// The packed upper triangle of one slice.
    pub fn slice_values(&self, slice_index: usize) -> Result<&[f32], IndexError> {
        self.check_slice(slice_index)?;
        let per_slice = self.elements_per_slice();
        let start = slice_index * per_slice;
        Ok(&self.values[start..start + per_slice])
    }

    /// Looks up the correlation between residues `i` and `j` in one slice.
    ///
    /// The pair is unordered: `value(s, i, j) == value(s, j, i)`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] when the slice or either residue index is out of range.
    pub fn value(&self, slice_index: usize, i: usize, j: usize) -> Result<f32, IndexError> {
        self.check_slice(slice_index)?;
        self.check_residue(i)?;
        self.check_residue(j)?;
        let index =
            slice_index * self.elements_per_slice() + packed::offset(self.num_atoms, i, j);
        Ok(self.values[index])
    }

    /// Rebuilds the full symmetric `num_atoms x num_atoms` matrix of one slice.
    ///
    /// Costs `O(num_atoms^2)`; meant to be called once per slice per load or
    /// reconfiguration.
    pub fn expand_slice(&self, slice_index: usize) -> Result<DMatrix<f64>, IndexError> {
        let packed_slice = self.slice_values(slice_index)?;
        let n = self.num_atoms;
        let mut matrix = DMatrix::zeros(n, n);
        let mut cursor = packed_slice.iter();
        for i in 0..n {
            for j in i..n {
                // Row-by-row walk follows `packed::offset`, so a plain iterator suffices.
                let value = f64::from(*cursor.next().unwrap_or(&0.0));
                matrix[(i, j)] = value;
                matrix[(j, i)] = value;
            }
        }
        Ok(matrix)
    }

    pub fn slice_summary(&self, slice_index: usize) -> Result<SliceSummary, IndexError> {
        let packed_slice = self.slice_values(slice_index)?;
        if packed_slice.is_empty() {
            return Ok(SliceSummary {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
            });
        }
        let (min, max, sum) = packed_slice.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + f64::from(v)),
        );
        Ok(SliceSummary {
            min,
            max,
            mean: sum / packed_slice.len() as f64,
        })
    }

    fn check_slice(&self, slice_index: usize) -> Result<(), IndexError> {
        if slice_index >= self.num_slices {
            return Err(IndexError::SliceOutOfRange {
                index: slice_index,
                num_slices: self.num_slices,
            });
        }
        Ok(())
    }

    fn check_residue(&self, residue: usize) -> Result<(), IndexError> {
        if residue >= self.num_atoms {
            return Err(IndexError::ResidueOutOfRange {
                index: residue,
                num_atoms: self.num_atoms,
            });
        }
        Ok(())
    }
}
