//! Error types for implore-grid
//!
//! All errors are contract errors raised synchronously to the caller:
//! - Construction of datasets with inconsistent shapes
//! - Out of range dimensions and indices
//! - Invalid dimension permutations
//! - Listener failures after a committed mutation

use thiserror::Error;

/// Main error type for grid dataset operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Dataset could not be constructed
    #[error("Failed to construct dataset: {0}")]
    Construction(#[from] ConstructionError),

    /// Dimension index outside the dataset
    #[error("Dimension {dim} out of bounds for dataset with {dimension} dimensions")]
    DimensionOutOfBounds { dim: usize, dimension: usize },

    /// Data index outside a dimension
    #[error("Index {index} out of bounds for dimension {dim} of length {len}")]
    IndexOutOfBounds { dim: usize, index: usize, len: usize },

    /// Permutation rejected before any state changed
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(#[from] PermutationError),

    /// Malformed call arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Grid-only operation called on a value dimension
    #[error("Dimension {dim} is not a grid dimension (nGrid = {n_grid})")]
    NotAGridDimension { dim: usize, n_grid: usize },

    /// Grid-only operation called on a plain dataset
    #[error("Dataset does not expose a grid")]
    NotAGrid,

    /// One or more listeners failed; the mutation itself has committed
    #[error("{} listener(s) failed: {}", failures.len(), failures.join("; "))]
    ListenerFailed { failures: Vec<String> },
}

/// Errors raised while building a dataset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// Not enough dimensions for the requested grid
    #[error("Dimensionality of data ({dimension}) has to be higher than nGrid ({n_grid})")]
    TooFewDimensions { dimension: usize, n_grid: usize },

    /// A value dimension does not match the grid point count
    #[error(
        "The supplied data has inconsistent dimensionality: grid shape {shape} = {expected} points, \
         but value dimension {dim} has {actual}"
    )]
    InconsistentShape {
        dim: usize,
        shape: String,
        expected: usize,
        actual: usize,
    },

    /// Columns of a point dataset differ in length
    #[error("Dimension {dim} has {actual} values, expected {expected}")]
    RaggedColumns {
        dim: usize,
        expected: usize,
        actual: usize,
    },

    /// Z matrix does not match the x/y axes of a legacy dataset
    #[error("Z matrix must be {ny} rows of {nx} values, row {row} has {actual}")]
    LegacyShape {
        nx: usize,
        ny: usize,
        row: usize,
        actual: usize,
    },
}

/// Reasons a permutation is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    /// Fewer entries than dataset dimensions
    #[error("Insufficient permutation length {len} w.r.t. dataset dimensions ({dimension})")]
    TooShort { len: usize, dimension: usize },

    /// Entry addresses a dimension the dataset does not have
    #[error("permutation[{position}] contains dimIndex {entry} outside dataset dimension ({dimension})")]
    EntryOutOfRange {
        position: usize,
        entry: usize,
        dimension: usize,
    },

    /// Same underlying dimension addressed twice
    #[error("Dimension {entry} appears more than once in the permutation")]
    Duplicate { entry: usize },

    /// Grid dimension placed after a value dimension
    #[error(
        "All grid dimensions must be before value dimensions: permutation[{position}] = {entry} \
         is a grid dimension (nGrid = {n_grid})"
    )]
    GridAfterValue {
        position: usize,
        entry: usize,
        n_grid: usize,
    },

    /// Swap of the first two axes on a dataset without two axes
    #[error("Cannot transpose a dataset with {dimension} dimension(s)")]
    CannotTranspose { dimension: usize },
}

/// Result type alias for grid dataset operations
pub type GridResult<T> = Result<T, GridError>;

/// Validation utilities shared by the dataset implementations
pub mod validation {
    use super::*;

    /// Validate a dimension index
    pub fn check_dimension(dim: usize, dimension: usize) -> GridResult<()> {
        if dim >= dimension {
            return Err(GridError::DimensionOutOfBounds { dim, dimension });
        }
        Ok(())
    }

    /// Validate a data index within one dimension
    pub fn check_index(dim: usize, index: usize, len: usize) -> GridResult<()> {
        if index >= len {
            return Err(GridError::IndexOutOfBounds { dim, index, len });
        }
        Ok(())
    }

    /// Validate a permutation and return its first `dimension` entries.
    ///
    /// Longer permutations are accepted and truncated; the retained prefix
    /// must be a bijection over `[0, dimension)`.
    pub fn check_permutation(permutation: &[usize], dimension: usize) -> GridResult<Vec<usize>> {
        if permutation.len() < dimension {
            return Err(PermutationError::TooShort {
                len: permutation.len(),
                dimension,
            }
            .into());
        }
        let mut seen = vec![false; dimension];
        for (position, &entry) in permutation.iter().take(dimension).enumerate() {
            if entry >= dimension {
                return Err(PermutationError::EntryOutOfRange {
                    position,
                    entry,
                    dimension,
                }
                .into());
            }
            if seen[entry] {
                return Err(PermutationError::Duplicate { entry }.into());
            }
            seen[entry] = true;
        }
        Ok(permutation[..dimension].to_vec())
    }

    /// Derive the number of leading grid entries of a permutation.
    ///
    /// Scans for the first entry addressing a value dimension of the
    /// underlying dataset; any later grid entry is rejected.
    pub fn grid_prefix(permutation: &[usize], underlying_n_grid: usize) -> GridResult<usize> {
        let mut n_grid = permutation.len();
        let mut in_grid = true;
        for (position, &entry) in permutation.iter().enumerate() {
            if in_grid {
                if entry >= underlying_n_grid {
                    in_grid = false;
                    n_grid = position;
                }
            } else if entry < underlying_n_grid {
                return Err(PermutationError::GridAfterValue {
                    position,
                    entry,
                    n_grid: underlying_n_grid,
                }
                .into());
            }
        }
        Ok(n_grid)
    }
}
