//! Dataset contracts and the capability-tagged dataset handle
//!
//! The [`DataSet`] trait is the narrow read contract consumers (renderers,
//! plugins, spectrogram builders) couple to. [`GridDataSet`] refines it for
//! data on cartesian grids: the first `n_grid` dimensions hold axis
//! coordinates, the remaining dimensions hold one value per grid point.

use std::sync::Arc;

use crate::axis::AxisDescription;
use crate::error::GridResult;
use crate::event::EventListeners;
use crate::lock::DataSetLock;

/// Index of the x dimension
pub const DIM_X: usize = 0;
/// Index of the y dimension
pub const DIM_Y: usize = 1;
/// Index of the z dimension
pub const DIM_Z: usize = 2;

/// Read contract shared by all datasets
///
/// Implementations must be safe to read from several threads at once.
/// Callers that need several reads to be mutually consistent hold
/// `lock().read()` for their duration.
pub trait DataSet: Send + Sync {
    /// Dataset name
    fn name(&self) -> &str;

    /// Number of dimensions
    fn dimension(&self) -> usize;

    /// Number of data points
    fn data_count(&self) -> usize;

    /// Number of samples stored for one dimension
    fn data_count_in(&self, dim: usize) -> GridResult<usize>;

    /// Sample `index` of dimension `dim`
    fn get(&self, dim: usize, index: usize) -> GridResult<f64>;

    /// Index of the sample of `dim` closest to `value`.
    ///
    /// Out of range values clamp to the first or last index.
    fn index_of(&self, dim: usize, value: f64) -> GridResult<usize>;

    /// Snapshot of the axis description of one dimension
    fn axis_description(&self, dim: usize) -> GridResult<AxisDescription>;

    /// Recompute the range of one dimension from its data.
    ///
    /// Only the axis state is locked, so callers may hold `lock().read()`.
    fn recompute_limits(&self, dim: usize) -> GridResult<AxisDescription>;

    /// Lock guarding this dataset's consistency domain
    fn lock(&self) -> &DataSetLock;

    /// Listeners notified after committed mutations
    fn listeners(&self) -> &EventListeners;

    /// All samples of one dimension
    fn values(&self, dim: usize) -> GridResult<Vec<f64>> {
        let n = self.data_count_in(dim)?;
        (0..n).map(|i| self.get(dim, i)).collect()
    }

    /// Recompute the range of every dimension
    fn recompute_all_limits(&self) -> GridResult<()> {
        for dim in 0..self.dimension() {
            self.recompute_limits(dim)?;
        }
        Ok(())
    }
}

/// Dataset on a cartesian grid
pub trait GridDataSet: DataSet {
    /// Number of dimensions spanning the grid
    fn n_grid(&self) -> usize;

    /// Coordinate `index` of grid dimension `dim`
    fn grid(&self, dim: usize, index: usize) -> GridResult<f64>;

    /// Sample of dimension `dim` at a grid multi-index.
    ///
    /// Missing trailing indices are treated as 0. For a grid dimension this
    /// is the coordinate `grid(dim, indices[dim])`.
    fn value(&self, dim: usize, indices: &[usize]) -> GridResult<f64>;

    /// This dataset through the plain contract
    fn as_data_set(&self) -> &dyn DataSet;

    /// All coordinates of one grid dimension
    fn grid_values(&self, dim: usize) -> GridResult<Vec<f64>> {
        let n = self.data_count_in(dim)?;
        (0..n).map(|i| self.grid(dim, i)).collect()
    }
}

/// Legacy contract for 3-D data stored as an x/y grid with one z value per
/// grid point
pub trait DataSet3D: DataSet {
    /// Z value at grid point `(x_index, y_index)`
    fn z(&self, x_index: usize, y_index: usize) -> GridResult<f64>;
}

/// Shared dataset reference tagged with its capability
///
/// Views decide between plain and grid behaviour by matching on this tag once,
/// when they are created.
#[derive(Clone)]
pub enum DataSetHandle {
    Plain(Arc<dyn DataSet>),
    Grid(Arc<dyn GridDataSet>),
}

impl DataSetHandle {
    /// Wrap a dataset that only offers the plain contract
    pub fn plain(data_set: impl DataSet + 'static) -> Self {
        Self::Plain(Arc::new(data_set))
    }

    /// Wrap a grid dataset
    pub fn grid(data_set: impl GridDataSet + 'static) -> Self {
        Self::Grid(Arc::new(data_set))
    }

    /// The dataset through the plain contract
    pub fn as_data_set(&self) -> &dyn DataSet {
        match self {
            Self::Plain(data_set) => data_set.as_ref(),
            Self::Grid(grid) => grid.as_data_set(),
        }
    }

    /// The grid contract, if this handle carries it
    pub fn as_grid(&self) -> Option<&dyn GridDataSet> {
        match self {
            Self::Plain(_) => None,
            Self::Grid(grid) => Some(grid.as_ref()),
        }
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, Self::Grid(_))
    }
}

impl std::fmt::Debug for DataSetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (kind, data_set) = match self {
            Self::Plain(data_set) => ("Plain", data_set.as_ref()),
            Self::Grid(grid) => ("Grid", grid.as_data_set()),
        };
        f.debug_struct("DataSetHandle")
            .field("kind", &kind)
            .field("name", &data_set.name())
            .field("dimension", &data_set.dimension())
            .finish()
    }
}

impl From<Arc<dyn DataSet>> for DataSetHandle {
    fn from(data_set: Arc<dyn DataSet>) -> Self {
        Self::Plain(data_set)
    }
}

impl From<Arc<dyn GridDataSet>> for DataSetHandle {
    fn from(grid: Arc<dyn GridDataSet>) -> Self {
        Self::Grid(grid)
    }
}
