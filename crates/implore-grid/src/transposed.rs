//! Permuted views over datasets
//!
//! A [`TransposedDataSet`] reorders the dimensions of another dataset
//! without copying any data. Accessors map the view dimension `v` to the
//! underlying dimension `permutation[v]` and delegate.
//!
//! Views built on a [`DataSetHandle::Grid`] keep grid behaviour: grid
//! dimensions must stay contiguous at the front of the permutation, and
//! [`GridDataSet::value`] permutes the multi-index as well as the queried
//! dimension.
//!
//! The permutation lives in an [`ArcSwap`] snapshot. Readers never block on
//! it; [`set_permutation`](TransposedDataSet::set_permutation) and
//! [`set_transposed`](TransposedDataSet::set_transposed) replace it while
//! holding the underlying dataset's write lock.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::axis::AxisDescription;
use crate::dataset::{DataSet, DataSetHandle, GridDataSet};
use crate::error::{validation, GridError, GridResult, PermutationError};
use crate::event::{DataSetEvent, EventListeners};
use crate::lock::DataSetLock;

/// Current permutation of a view
#[derive(Debug, Clone, PartialEq, Eq)]
struct PermutationState {
    /// Effective mapping from view dimension to underlying dimension
    permutation: Vec<usize>,
    /// Whether dimensions 0 and 1 are swapped on top of the set permutation
    transposed: bool,
    /// Leading grid dimensions; `None` for views over plain datasets
    n_grid: Option<usize>,
}

/// Dimension-permuted view of another dataset
pub struct TransposedDataSet {
    underlying: DataSetHandle,
    state: ArcSwap<PermutationState>,
}

impl TransposedDataSet {
    /// View of `underlying` with dimensions reordered by `permutation`.
    ///
    /// Entries past the dataset's dimension count are ignored.
    pub fn permute(underlying: DataSetHandle, permutation: &[usize]) -> GridResult<Self> {
        let dimension = underlying.as_data_set().dimension();
        let permutation = validation::check_permutation(permutation, dimension)?;
        let state = derive_state(&underlying, permutation, false)?;
        Ok(Self::from_state(underlying, state))
    }

    /// View of `underlying` with dimensions 0 and 1 swapped if `swap` is set,
    /// the identity view otherwise
    pub fn transpose(underlying: DataSetHandle, swap: bool) -> GridResult<Self> {
        let dimension = underlying.as_data_set().dimension();
        let mut permutation: Vec<usize> = (0..dimension).collect();
        if swap {
            swap_leading(&mut permutation)?;
        }
        let state = derive_state(&underlying, permutation, swap)?;
        Ok(Self::from_state(underlying, state))
    }

    fn from_state(underlying: DataSetHandle, state: PermutationState) -> Self {
        tracing::debug!(
            "Created view of '{}' with permutation {:?}",
            underlying.as_data_set().name(),
            state.permutation
        );
        Self {
            underlying,
            state: ArcSwap::from_pointee(state),
        }
    }

    /// The wrapped dataset
    pub fn underlying(&self) -> &DataSetHandle {
        &self.underlying
    }

    /// Effective permutation, including the transposition swap
    pub fn permutation(&self) -> Vec<usize> {
        self.state.load().permutation.clone()
    }

    pub fn is_transposed(&self) -> bool {
        self.state.load().transposed
    }

    /// Number of leading grid dimensions, `None` for a plain view
    pub fn n_grid(&self) -> Option<usize> {
        self.state.load().n_grid
    }

    /// Replace the permutation.
    ///
    /// While the view is transposed, entries 0 and 1 of `permutation` are
    /// swapped before it is applied. A rejected permutation leaves the view
    /// unchanged and fires no event.
    pub fn set_permutation(&self, permutation: &[usize]) -> GridResult<()> {
        {
            let _guard = self.lock().write();
            let current = self.state.load();
            let mut permutation = validation::check_permutation(permutation, self.dimension())?;
            if current.transposed {
                swap_leading(&mut permutation)?;
            }
            let next = derive_state(&self.underlying, permutation, current.transposed)?;
            tracing::debug!(
                "Permutation of '{}' changed to {:?}",
                self.name(),
                next.permutation
            );
            self.state.store(Arc::new(next));
        }
        self.listeners()
            .fire(&DataSetEvent::axis_changed("permutation changed"))
    }

    /// Turn the swap of dimensions 0 and 1 on or off
    pub fn set_transposed(&self, transposed: bool) -> GridResult<()> {
        {
            let _guard = self.lock().write();
            let current = self.state.load();
            if current.transposed != transposed {
                let mut permutation = current.permutation.clone();
                swap_leading(&mut permutation)?;
                let next = derive_state(&self.underlying, permutation, transposed)?;
                tracing::debug!(
                    "View of '{}' transposed = {}, permutation {:?}",
                    self.name(),
                    transposed,
                    next.permutation
                );
                self.state.store(Arc::new(next));
            }
        }
        let message = if transposed { "transposed" } else { "untransposed" };
        self.listeners().fire(&DataSetEvent::axis_changed(message))
    }

    /// Wrap the view in a handle carrying the same capability as the
    /// underlying dataset, so views can be stacked
    pub fn into_handle(self) -> DataSetHandle {
        if self.underlying.is_grid() {
            DataSetHandle::Grid(Arc::new(self))
        } else {
            DataSetHandle::Plain(Arc::new(self))
        }
    }

    /// Underlying dimension behind view dimension `dim`
    fn map_dimension(&self, dim: usize) -> GridResult<usize> {
        let state = self.state.load();
        state
            .permutation
            .get(dim)
            .copied()
            .ok_or(GridError::DimensionOutOfBounds {
                dim,
                dimension: state.permutation.len(),
            })
    }

    fn inner(&self) -> &dyn DataSet {
        self.underlying.as_data_set()
    }
}

fn swap_leading(permutation: &mut [usize]) -> GridResult<()> {
    if permutation.len() < 2 {
        return Err(PermutationError::CannotTranspose {
            dimension: permutation.len(),
        }
        .into());
    }
    permutation.swap(0, 1);
    Ok(())
}

fn derive_state(
    underlying: &DataSetHandle,
    permutation: Vec<usize>,
    transposed: bool,
) -> GridResult<PermutationState> {
    let n_grid = match underlying.as_grid() {
        Some(grid) => Some(validation::grid_prefix(&permutation, grid.n_grid())?),
        None => None,
    };
    Ok(PermutationState {
        permutation,
        transposed,
        n_grid,
    })
}

impl std::fmt::Debug for TransposedDataSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        f.debug_struct("TransposedDataSet")
            .field("underlying", &self.underlying)
            .field("permutation", &state.permutation)
            .field("transposed", &state.transposed)
            .field("n_grid", &state.n_grid)
            .finish()
    }
}

impl DataSet for TransposedDataSet {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn dimension(&self) -> usize {
        self.inner().dimension()
    }

    fn data_count(&self) -> usize {
        self.inner().data_count()
    }

    fn data_count_in(&self, dim: usize) -> GridResult<usize> {
        self.inner().data_count_in(self.map_dimension(dim)?)
    }

    fn get(&self, dim: usize, index: usize) -> GridResult<f64> {
        self.inner().get(self.map_dimension(dim)?, index)
    }

    fn index_of(&self, dim: usize, value: f64) -> GridResult<usize> {
        self.inner().index_of(self.map_dimension(dim)?, value)
    }

    fn axis_description(&self, dim: usize) -> GridResult<AxisDescription> {
        self.inner().axis_description(self.map_dimension(dim)?)
    }

    fn recompute_limits(&self, dim: usize) -> GridResult<AxisDescription> {
        self.inner().recompute_limits(self.map_dimension(dim)?)
    }

    fn lock(&self) -> &DataSetLock {
        self.inner().lock()
    }

    fn listeners(&self) -> &EventListeners {
        self.inner().listeners()
    }

    fn values(&self, dim: usize) -> GridResult<Vec<f64>> {
        self.inner().values(self.map_dimension(dim)?)
    }
}

impl GridDataSet for TransposedDataSet {
    fn n_grid(&self) -> usize {
        self.state.load().n_grid.unwrap_or(0)
    }

    fn grid(&self, dim: usize, index: usize) -> GridResult<f64> {
        let grid = self.underlying.as_grid().ok_or(GridError::NotAGrid)?;
        let n_grid = GridDataSet::n_grid(self);
        if dim >= n_grid {
            return Err(GridError::NotAGridDimension { dim, n_grid });
        }
        grid.grid(self.map_dimension(dim)?, index)
    }

    fn value(&self, dim: usize, indices: &[usize]) -> GridResult<f64> {
        let grid = self.underlying.as_grid().ok_or(GridError::NotAGrid)?;
        let state = self.state.load();
        let n_grid = state.n_grid.unwrap_or(0);
        let mut underlying_indices = vec![0; n_grid];
        for (v, &target) in state.permutation.iter().take(n_grid).enumerate() {
            underlying_indices[target] = indices.get(v).copied().unwrap_or(0);
        }
        let target = state
            .permutation
            .get(dim)
            .copied()
            .ok_or(GridError::DimensionOutOfBounds {
                dim,
                dimension: state.permutation.len(),
            })?;
        grid.value(target, &underlying_indices)
    }

    fn as_data_set(&self) -> &dyn DataSet {
        self
    }

    fn grid_values(&self, dim: usize) -> GridResult<Vec<f64>> {
        let grid = self.underlying.as_grid().ok_or(GridError::NotAGrid)?;
        let n_grid = GridDataSet::n_grid(self);
        if dim >= n_grid {
            return Err(GridError::NotAGridDimension { dim, n_grid });
        }
        grid.grid_values(self.map_dimension(dim)?)
    }
}
