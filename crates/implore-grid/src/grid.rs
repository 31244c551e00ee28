//! Grid dataset backed by flat `f64` arrays
//!
//! `DoubleGridDataSet` stores one array per dimension. Grid dimensions hold
//! their axis coordinates, value dimensions hold one sample per grid point in
//! canonical order (dimension 0 varies fastest). The shape is fixed at
//! construction; only axis descriptions change afterwards.
//!
//! ```text
//!  dim 1 \ dim 0 |  1   2   3
//!  --------------+-----------
//!        4       |  v0  v1  v2
//!        5       |  v3  v4  v5
//!        6       |  v6  v7  v8
//! ```

use parking_lot::RwLock;

use crate::axis::AxisDescription;
use crate::dataset::{DataSet, GridDataSet};
use crate::error::{validation, ConstructionError, GridError, GridResult};
use crate::event::{DataSetEvent, EventListeners};
use crate::index::{nearest_index, GridShape};
use crate::lock::DataSetLock;

/// Read-only dataset on a non-equidistant cartesian grid
#[derive(Debug)]
pub struct DoubleGridDataSet {
    name: String,
    n_grid: usize,
    shape: GridShape,
    data: Vec<Vec<f64>>,
    axes: RwLock<Vec<AxisDescription>>,
    lock: DataSetLock,
    listeners: EventListeners,
}

impl DoubleGridDataSet {
    /// Create a grid dataset from per-dimension arrays.
    ///
    /// The first `n_grid` arrays are the grid coordinates, every further array
    /// must hold exactly one value per grid point.
    pub fn new(name: impl Into<String>, n_grid: usize, data: Vec<Vec<f64>>) -> GridResult<Self> {
        if data.len() <= n_grid {
            return Err(ConstructionError::TooFewDimensions {
                dimension: data.len(),
                n_grid,
            }
            .into());
        }
        let lens: Vec<usize> = data[..n_grid].iter().map(Vec::len).collect();
        let shape = GridShape::new(&lens);
        for (dim, values) in data.iter().enumerate().skip(n_grid) {
            if values.len() != shape.size() {
                return Err(ConstructionError::InconsistentShape {
                    dim,
                    shape: shape.describe(),
                    expected: shape.size(),
                    actual: values.len(),
                }
                .into());
            }
        }

        let name = name.into();
        tracing::debug!(
            "Created grid dataset '{}': grid {} with {} value dimension(s)",
            name,
            shape.describe(),
            data.len() - n_grid
        );
        let axes = (0..data.len()).map(AxisDescription::for_dimension).collect();
        Ok(Self {
            name,
            n_grid,
            shape,
            data,
            axes: RwLock::new(axes),
            lock: DataSetLock::new(),
            listeners: EventListeners::new(),
        })
    }

    /// Create a zero-filled dataset with the given grid shape
    pub fn with_shape(
        name: impl Into<String>,
        dimension: usize,
        shape: &[usize],
    ) -> GridResult<Self> {
        let size: usize = shape.iter().product();
        let data = (0..dimension)
            .map(|dim| match shape.get(dim) {
                Some(&len) => vec![0.0; len],
                None => vec![0.0; size],
            })
            .collect();
        Self::new(name, shape.len(), data)
    }

    /// Start building a dataset
    pub fn builder(name: impl Into<String>) -> GridDataSetBuilder {
        GridDataSetBuilder::new(name)
    }

    /// Grid shape and radix table
    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    /// Canonical flat index of a grid multi-index
    pub fn canonicalize(&self, indices: &[usize]) -> GridResult<usize> {
        self.shape.canonicalize(indices)
    }

    /// Grid multi-index of a canonical flat index
    pub fn decanonicalize(&self, flat: usize) -> GridResult<Vec<usize>> {
        self.shape.decanonicalize(flat)
    }

    /// Replace name and unit of one axis, keeping its range
    pub fn set_axis_label(
        &self,
        dim: usize,
        name: impl Into<String>,
        unit: Option<String>,
    ) -> GridResult<()> {
        validation::check_dimension(dim, self.dimension())?;
        {
            let _guard = self.lock.write();
            let mut axes = self.axes.write();
            axes[dim].name = name.into();
            axes[dim].unit = unit;
        }
        self.listeners
            .fire(&DataSetEvent::axis_changed("axis label changed").with_dimension(dim))
    }

    fn check_grid_dimension(&self, dim: usize) -> GridResult<()> {
        validation::check_dimension(dim, self.dimension())?;
        if dim >= self.n_grid {
            return Err(GridError::NotAGridDimension {
                dim,
                n_grid: self.n_grid,
            });
        }
        Ok(())
    }

    fn value_limits(values: &[f64]) -> AxisDescription {
        let mut range = AxisDescription::default();
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let (min, max) = values
                .par_iter()
                .copied()
                .filter(|v| !v.is_nan())
                .fold(
                    || (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), v| (lo.min(v), hi.max(v)),
                )
                .reduce(
                    || (f64::INFINITY, f64::NEG_INFINITY),
                    |(a, b), (c, d)| (a.min(c), b.max(d)),
                );
            if min <= max {
                range.set(min, max);
            }
        }
        #[cfg(not(feature = "parallel"))]
        range.add_all(values);
        range
    }
}

impl DataSet for DoubleGridDataSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Number of grid points
    fn data_count(&self) -> usize {
        self.data[self.n_grid].len()
    }

    fn data_count_in(&self, dim: usize) -> GridResult<usize> {
        validation::check_dimension(dim, self.dimension())?;
        Ok(self.data[dim].len())
    }

    /// For grid dimensions `index` is a canonical index and the coordinate
    /// along `dim` is returned; for value dimensions the stored value.
    fn get(&self, dim: usize, index: usize) -> GridResult<f64> {
        validation::check_dimension(dim, self.dimension())?;
        if dim < self.n_grid {
            self.shape.check_flat(index)?;
            return Ok(self.data[dim][self.shape.axis_index(dim, index)]);
        }
        validation::check_index(dim, index, self.data[dim].len())?;
        Ok(self.data[dim][index])
    }

    fn index_of(&self, dim: usize, value: f64) -> GridResult<usize> {
        self.check_grid_dimension(dim)?;
        Ok(nearest_index(&self.data[dim], value))
    }

    fn axis_description(&self, dim: usize) -> GridResult<AxisDescription> {
        validation::check_dimension(dim, self.dimension())?;
        Ok(self.axes.read()[dim].clone())
    }

    fn recompute_limits(&self, dim: usize) -> GridResult<AxisDescription> {
        validation::check_dimension(dim, self.dimension())?;
        let values = &self.data[dim];
        let range = if dim < self.n_grid {
            let mut range = AxisDescription::default();
            if let (Some(&first), Some(&last)) = (values.first(), values.last()) {
                range.set(first, last);
            }
            range
        } else {
            Self::value_limits(values)
        };

        let mut axes = self.axes.write();
        axes[dim].set(range.min, range.max);
        tracing::trace!(
            "Recomputed limits of '{}' dim {}: [{}, {}]",
            self.name,
            dim,
            range.min,
            range.max
        );
        Ok(axes[dim].clone())
    }

    fn lock(&self) -> &DataSetLock {
        &self.lock
    }

    fn listeners(&self) -> &EventListeners {
        &self.listeners
    }

    /// Stored array of `dim`: axis coordinates for grid dimensions
    fn values(&self, dim: usize) -> GridResult<Vec<f64>> {
        validation::check_dimension(dim, self.dimension())?;
        Ok(self.data[dim].clone())
    }
}

impl GridDataSet for DoubleGridDataSet {
    fn n_grid(&self) -> usize {
        self.n_grid
    }

    fn grid(&self, dim: usize, index: usize) -> GridResult<f64> {
        self.check_grid_dimension(dim)?;
        validation::check_index(dim, index, self.data[dim].len())?;
        Ok(self.data[dim][index])
    }

    fn value(&self, dim: usize, indices: &[usize]) -> GridResult<f64> {
        validation::check_dimension(dim, self.dimension())?;
        let flat = self.shape.canonicalize(indices)?;
        self.get(dim, flat)
    }

    fn as_data_set(&self) -> &dyn DataSet {
        self
    }
}

/// Builder for [`DoubleGridDataSet`]
#[derive(Debug, Clone, Default)]
pub struct GridDataSetBuilder {
    name: String,
    grid: Vec<Vec<f64>>,
    values: Vec<Vec<f64>>,
    labels: Vec<(usize, String, Option<String>)>,
    auto_notify: bool,
}

impl GridDataSetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto_notify: true,
            ..Default::default()
        }
    }

    /// Append a grid axis
    pub fn with_grid_axis(mut self, coordinates: impl Into<Vec<f64>>) -> Self {
        self.grid.push(coordinates.into());
        self
    }

    /// Append a value dimension in canonical order
    pub fn with_value_dimension(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.values.push(values.into());
        self
    }

    /// Name an axis, optionally with a unit
    pub fn with_axis_label(
        mut self,
        dim: usize,
        name: impl Into<String>,
        unit: Option<&str>,
    ) -> Self {
        self.labels.push((dim, name.into(), unit.map(str::to_string)));
        self
    }

    /// Whether mutations notify listeners (default: true)
    pub fn with_auto_notify(mut self, enabled: bool) -> Self {
        self.auto_notify = enabled;
        self
    }

    /// Validate and build the dataset
    pub fn build(self) -> GridResult<DoubleGridDataSet> {
        let n_grid = self.grid.len();
        let mut data = self.grid;
        data.extend(self.values);
        let data_set = DoubleGridDataSet::new(self.name, n_grid, data)?;
        {
            let mut axes = data_set.axes.write();
            for (dim, name, unit) in self.labels {
                validation::check_dimension(dim, axes.len())?;
                axes[dim].name = name;
                axes[dim].unit = unit;
            }
        }
        data_set.listeners.set_auto_notify(self.auto_notify);
        Ok(data_set)
    }
}
