//! Legacy 3-D datasets and their grid adapter
//!
//! Older consumers describe 3-D data as an x axis, a y axis and a z matrix
//! with one row per y coordinate ([`DataSet3D`]). [`LegacyGridAdapter`]
//! exposes such an object through [`GridDataSet`] with two grid dimensions.
//!
//! Flat indices follow a fixed row-major convention with x varying fastest:
//! flat index `k` addresses `(k % nx, k / nx)`. This matches the canonical
//! order of [`DoubleGridDataSet`](crate::grid::DoubleGridDataSet) only as long
//! as the wrapped object stores x as its first grid dimension.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::axis::AxisDescription;
use crate::dataset::{DataSet, DataSet3D, GridDataSet, DIM_X, DIM_Y, DIM_Z};
use crate::error::{validation, ConstructionError, GridError, GridResult};
use crate::event::{DataSetEvent, EventListeners};
use crate::index::nearest_index;
use crate::lock::DataSetLock;

#[derive(Debug)]
struct Surface {
    x: Vec<f64>,
    y: Vec<f64>,
    /// `z[y_index][x_index]`
    z: Vec<Vec<f64>>,
}

impl Surface {
    fn nx(&self) -> usize {
        self.x.len()
    }

    fn ny(&self) -> usize {
        self.y.len()
    }
}

/// 3-D dataset with x/y axes and a z matrix
#[derive(Debug)]
pub struct DoubleDataSet3D {
    name: String,
    surface: RwLock<Surface>,
    axes: RwLock<[AxisDescription; 3]>,
    lock: DataSetLock,
    listeners: EventListeners,
}

impl DoubleDataSet3D {
    /// Create an empty dataset
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surface: RwLock::new(Surface {
                x: Vec::new(),
                y: Vec::new(),
                z: Vec::new(),
            }),
            axes: RwLock::new([
                AxisDescription::for_dimension(DIM_X),
                AxisDescription::for_dimension(DIM_Y),
                AxisDescription::for_dimension(DIM_Z),
            ]),
            lock: DataSetLock::new(),
            listeners: EventListeners::new(),
        }
    }

    /// Create a dataset from axes and a z matrix of `y.len()` rows by
    /// `x.len()` columns
    pub fn new(
        name: impl Into<String>,
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<Vec<f64>>,
    ) -> GridResult<Self> {
        let (nx, ny) = (x.len(), y.len());
        if z.len() != ny {
            return Err(ConstructionError::LegacyShape {
                nx,
                ny,
                row: z.len(),
                actual: 0,
            }
            .into());
        }
        if let Some((row, values)) = z.iter().enumerate().find(|(_, row)| row.len() != nx) {
            return Err(ConstructionError::LegacyShape {
                nx,
                ny,
                row,
                actual: values.len(),
            }
            .into());
        }

        let data_set = Self::empty(name);
        {
            let mut axes = data_set.axes.write();
            axes[DIM_X].add_all(&x);
            axes[DIM_Y].add_all(&y);
            for row in &z {
                axes[DIM_Z].add_all(row);
            }
        }
        *data_set.surface.write() = Surface { x, y, z };
        Ok(data_set)
    }

    /// Overwrite one z value
    pub fn set_z(&self, x_index: usize, y_index: usize, value: f64) -> GridResult<()> {
        {
            let _guard = self.lock.write();
            let mut surface = self.surface.write();
            validation::check_index(DIM_X, x_index, surface.nx())?;
            validation::check_index(DIM_Y, y_index, surface.ny())?;
            surface.z[y_index][x_index] = value;
            self.axes.write()[DIM_Z].add(value);
        }
        self.listeners
            .fire(&DataSetEvent::updated("set z").with_dimension(DIM_Z))
    }
}

impl DataSet for DoubleDataSet3D {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        3
    }

    fn data_count(&self) -> usize {
        let surface = self.surface.read();
        surface.nx() * surface.ny()
    }

    fn data_count_in(&self, dim: usize) -> GridResult<usize> {
        let surface = self.surface.read();
        match dim {
            DIM_X => Ok(surface.nx()),
            DIM_Y => Ok(surface.ny()),
            DIM_Z => Ok(surface.nx() * surface.ny()),
            _ => Err(GridError::DimensionOutOfBounds { dim, dimension: 3 }),
        }
    }

    /// Z samples are addressed row by row: `index = y_index * nx + x_index`
    fn get(&self, dim: usize, index: usize) -> GridResult<f64> {
        let surface = self.surface.read();
        match dim {
            DIM_X => {
                validation::check_index(dim, index, surface.nx())?;
                Ok(surface.x[index])
            }
            DIM_Y => {
                validation::check_index(dim, index, surface.ny())?;
                Ok(surface.y[index])
            }
            DIM_Z => {
                let nx = surface.nx();
                validation::check_index(dim, index, nx * surface.ny())?;
                Ok(surface.z[index / nx][index % nx])
            }
            _ => Err(GridError::DimensionOutOfBounds { dim, dimension: 3 }),
        }
    }

    fn index_of(&self, dim: usize, value: f64) -> GridResult<usize> {
        let surface = self.surface.read();
        match dim {
            DIM_X => Ok(nearest_index(&surface.x, value)),
            DIM_Y => Ok(nearest_index(&surface.y, value)),
            DIM_Z => Err(GridError::NotAGridDimension { dim, n_grid: 2 }),
            _ => Err(GridError::DimensionOutOfBounds { dim, dimension: 3 }),
        }
    }

    fn axis_description(&self, dim: usize) -> GridResult<AxisDescription> {
        validation::check_dimension(dim, 3)?;
        Ok(self.axes.read()[dim].clone())
    }

    fn recompute_limits(&self, dim: usize) -> GridResult<AxisDescription> {
        validation::check_dimension(dim, 3)?;
        let surface = self.surface.read();
        let mut axes = self.axes.write();
        let axis = &mut axes[dim];
        axis.clear();
        match dim {
            DIM_X => {
                axis.add_all(&surface.x);
            }
            DIM_Y => {
                axis.add_all(&surface.y);
            }
            _ => {
                for row in &surface.z {
                    axis.add_all(row);
                }
            }
        }
        Ok(axis.clone())
    }

    fn lock(&self) -> &DataSetLock {
        &self.lock
    }

    fn listeners(&self) -> &EventListeners {
        &self.listeners
    }
}

impl DataSet3D for DoubleDataSet3D {
    fn z(&self, x_index: usize, y_index: usize) -> GridResult<f64> {
        let surface = self.surface.read();
        validation::check_index(DIM_X, x_index, surface.nx())?;
        validation::check_index(DIM_Y, y_index, surface.ny())?;
        Ok(surface.z[y_index][x_index])
    }
}

/// [`GridDataSet`] view of a legacy [`DataSet3D`]
///
/// Holds no state besides the wrapped object; locking, listeners and limits
/// all belong to the wrapped dataset.
#[derive(Clone)]
pub struct LegacyGridAdapter {
    wrapped: Arc<dyn DataSet3D>,
}

impl LegacyGridAdapter {
    pub fn new(wrapped: Arc<dyn DataSet3D>) -> Self {
        Self { wrapped }
    }

    /// The wrapped legacy dataset
    pub fn wrapped(&self) -> &Arc<dyn DataSet3D> {
        &self.wrapped
    }

    /// Split a flat index into `(x_index, y_index)` after checking it
    /// addresses a grid point
    fn split(&self, dim: usize, flat: usize) -> GridResult<(usize, usize)> {
        let nx = self.wrapped.data_count_in(DIM_X)?;
        let ny = self.wrapped.data_count_in(DIM_Y)?;
        validation::check_index(dim, flat, nx * ny)?;
        Ok((flat % nx, flat / nx))
    }
}

impl std::fmt::Debug for LegacyGridAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyGridAdapter")
            .field("wrapped", &self.wrapped.name())
            .finish()
    }
}

impl DataSet for LegacyGridAdapter {
    fn name(&self) -> &str {
        self.wrapped.name()
    }

    fn dimension(&self) -> usize {
        3
    }

    fn data_count(&self) -> usize {
        self.wrapped.data_count()
    }

    fn data_count_in(&self, dim: usize) -> GridResult<usize> {
        self.wrapped.data_count_in(dim)
    }

    fn get(&self, dim: usize, index: usize) -> GridResult<f64> {
        validation::check_dimension(dim, 3)?;
        let (x_index, y_index) = self.split(dim, index)?;
        match dim {
            DIM_X => self.wrapped.get(DIM_X, x_index),
            DIM_Y => self.wrapped.get(DIM_Y, y_index),
            _ => self.wrapped.z(x_index, y_index),
        }
    }

    fn index_of(&self, dim: usize, value: f64) -> GridResult<usize> {
        self.wrapped.index_of(dim, value)
    }

    fn axis_description(&self, dim: usize) -> GridResult<AxisDescription> {
        self.wrapped.axis_description(dim)
    }

    fn recompute_limits(&self, dim: usize) -> GridResult<AxisDescription> {
        self.wrapped.recompute_limits(dim)
    }

    fn lock(&self) -> &DataSetLock {
        self.wrapped.lock()
    }

    fn listeners(&self) -> &EventListeners {
        self.wrapped.listeners()
    }

    /// Axis samples for X and Y, z values row by row for Z
    fn values(&self, dim: usize) -> GridResult<Vec<f64>> {
        validation::check_dimension(dim, 3)?;
        self.wrapped.values(dim)
    }
}

impl GridDataSet for LegacyGridAdapter {
    fn n_grid(&self) -> usize {
        2
    }

    /// `index` is read with the flat row-major convention, like [`get`].
    ///
    /// [`get`]: DataSet::get
    fn grid(&self, dim: usize, index: usize) -> GridResult<f64> {
        match dim {
            DIM_X | DIM_Y => self.get(dim, index),
            _ => Err(GridError::NotAGridDimension { dim, n_grid: 2 }),
        }
    }

    /// Requires exactly two indices `[x_index, y_index]`
    fn value(&self, dim: usize, indices: &[usize]) -> GridResult<f64> {
        let &[x_index, y_index] = indices else {
            return Err(GridError::InvalidArgument(format!(
                "wrong number of indices ({}), should be 2",
                indices.len()
            )));
        };
        match dim {
            DIM_X => self.wrapped.get(DIM_X, x_index),
            DIM_Y => self.wrapped.get(DIM_Y, y_index),
            DIM_Z => self.wrapped.z(x_index, y_index),
            _ => Err(GridError::DimensionOutOfBounds { dim, dimension: 3 }),
        }
    }

    fn as_data_set(&self) -> &dyn DataSet {
        self
    }

    /// Coordinates along X or Y, read per axis rather than by flat index
    fn grid_values(&self, dim: usize) -> GridResult<Vec<f64>> {
        match dim {
            DIM_X | DIM_Y => self.wrapped.values(dim),
            _ => Err(GridError::NotAGridDimension { dim, n_grid: 2 }),
        }
    }
}
