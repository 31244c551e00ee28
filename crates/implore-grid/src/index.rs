//! Canonical (mixed-radix) indexing over cartesian grids
//!
//! A grid with axis lengths `(n0, n1, ..., nk)` stores one value per grid
//! point in a flat array. The flat position of multi-index `(i0, ..., ik)` is
//! `i0 + n0 * (i1 + n1 * (i2 + ...))`, so dimension 0 varies fastest.

use crate::error::{validation, GridError, GridResult};

/// Shape and radix table of a cartesian grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridShape {
    lens: Vec<usize>,
    strides: Vec<usize>,
    size: usize,
}

impl GridShape {
    /// Build the radix table for the given axis lengths
    pub fn new(lens: &[usize]) -> Self {
        let mut strides = Vec::with_capacity(lens.len());
        let mut size = 1usize;
        for &len in lens {
            strides.push(size);
            size = size.saturating_mul(len);
        }
        Self {
            lens: lens.to_vec(),
            strides,
            size,
        }
    }

    /// Number of grid axes
    pub fn n_grid(&self) -> usize {
        self.lens.len()
    }

    /// Number of points along one axis
    pub fn len(&self, dim: usize) -> usize {
        self.lens[dim]
    }

    /// Total number of grid points
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if the grid has no points
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Shape as `3x4x2`
    pub fn describe(&self) -> String {
        self.lens
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("x")
    }

    /// Encode a multi-index into its canonical flat index.
    ///
    /// Missing trailing indices are treated as 0, entries beyond the grid
    /// dimensionality are ignored.
    pub fn canonicalize(&self, indices: &[usize]) -> GridResult<usize> {
        let mut flat = 0;
        for dim in 0..self.n_grid() {
            let index = indices.get(dim).copied().unwrap_or(0);
            validation::check_index(dim, index, self.lens[dim])?;
            flat += self.strides[dim] * index;
        }
        Ok(flat)
    }

    /// Decode a canonical flat index into the full multi-index
    pub fn decanonicalize(&self, flat: usize) -> GridResult<Vec<usize>> {
        self.check_flat(flat)?;
        Ok((0..self.n_grid()).map(|dim| self.axis_index(dim, flat)).collect())
    }

    /// Index along `dim` encoded in a (validated) flat index
    pub(crate) fn axis_index(&self, dim: usize, flat: usize) -> usize {
        (flat / self.strides[dim]) % self.lens[dim]
    }

    pub(crate) fn check_flat(&self, flat: usize) -> GridResult<()> {
        if flat >= self.size {
            return Err(GridError::IndexOutOfBounds {
                dim: self.n_grid(),
                index: flat,
                len: self.size,
            });
        }
        Ok(())
    }
}

/// Index of the sample in `coords` closest to `value`.
///
/// `coords` must be sorted ascending. Out of range values clamp to the first
/// or last sample. Between two samples the upper one wins only if it is
/// strictly closer; ties resolve to the lower sample. Empty input yields 0.
pub fn nearest_index(coords: &[f64], value: f64) -> usize {
    if coords.is_empty() {
        return 0;
    }
    match coords.binary_search_by(|c| c.total_cmp(&value)) {
        Ok(exact) => exact,
        Err(0) => 0,
        Err(insert) if insert >= coords.len() => coords.len() - 1,
        Err(hi) => {
            let lo = hi - 1;
            let diff_high = coords[hi] - value;
            let diff_low = value - coords[lo];
            if diff_low > diff_high {
                hi
            } else {
                lo
            }
        }
    }
}
