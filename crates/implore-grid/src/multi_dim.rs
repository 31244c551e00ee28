//! Editable n-dimensional point dataset
//!
//! Each data point has one coordinate per dimension; coordinates are stored
//! column-wise. All mutators validate their input first, then change the
//! columns and axis ranges under the dataset's write guard, and finally
//! notify listeners once the guard is released.

use parking_lot::RwLock;

use crate::axis::AxisDescription;
use crate::dataset::DataSet;
use crate::error::{validation, ConstructionError, GridError, GridResult};
use crate::event::{DataSetEvent, EventListeners};
use crate::index::nearest_index;
use crate::lock::DataSetLock;

/// Point dataset storing `dimension` columns of equal length
#[derive(Debug)]
pub struct MultiDimDoubleDataSet {
    name: String,
    dimension: usize,
    columns: RwLock<Vec<Vec<f64>>>,
    axes: RwLock<Vec<AxisDescription>>,
    lock: DataSetLock,
    listeners: EventListeners,
}

impl MultiDimDoubleDataSet {
    /// Create an empty dataset
    pub fn new(name: impl Into<String>, dimension: usize) -> Self {
        Self::with_capacity(name, dimension, 0)
    }

    /// Create an empty dataset with room for `capacity` points
    pub fn with_capacity(name: impl Into<String>, dimension: usize, capacity: usize) -> Self {
        Self {
            name: name.into(),
            dimension,
            columns: RwLock::new(
                (0..dimension)
                    .map(|_| Vec::with_capacity(capacity))
                    .collect(),
            ),
            axes: RwLock::new((0..dimension).map(AxisDescription::for_dimension).collect()),
            lock: DataSetLock::new(),
            listeners: EventListeners::new(),
        }
    }

    /// Create a dataset from columns of equal length
    pub fn from_columns(name: impl Into<String>, columns: Vec<Vec<f64>>) -> GridResult<Self> {
        let expected = columns.first().map(Vec::len).unwrap_or(0);
        if let Some((dim, column)) = columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.len() != expected)
        {
            return Err(ConstructionError::RaggedColumns {
                dim,
                expected,
                actual: column.len(),
            }
            .into());
        }
        let data_set = Self::new(name, columns.len());
        {
            let mut axes = data_set.axes.write();
            refresh_axes(&columns, &mut axes);
        }
        *data_set.columns.write() = columns;
        Ok(data_set)
    }

    /// Append one point
    pub fn add(&self, point: &[f64]) -> GridResult<()> {
        self.check_width(point)?;
        {
            let _guard = self.lock.write();
            let mut columns = self.columns.write();
            let mut axes = self.axes.write();
            for (dim, &value) in point.iter().enumerate() {
                columns[dim].push(value);
                axes[dim].add(value);
            }
        }
        self.listeners.fire(&DataSetEvent::added("add"))
    }

    /// Insert one point before `index`; indices past the end append
    pub fn insert(&self, index: usize, point: &[f64]) -> GridResult<()> {
        self.check_width(point)?;
        {
            let _guard = self.lock.write();
            let mut columns = self.columns.write();
            let mut axes = self.axes.write();
            let at = index.min(count_of(&columns));
            for (dim, &value) in point.iter().enumerate() {
                columns[dim].insert(at, value);
                axes[dim].add(value);
            }
        }
        self.listeners.fire(&DataSetEvent::added("insert"))
    }

    /// Append several points given column-wise
    pub fn extend(&self, columns_new: &[Vec<f64>]) -> GridResult<()> {
        if columns_new.len() != self.dimension {
            return Err(GridError::InvalidArgument(format!(
                "expected {} columns, got {}",
                self.dimension,
                columns_new.len()
            )));
        }
        let n_points = columns_new.first().map(Vec::len).unwrap_or(0);
        if let Some((dim, column)) = columns_new
            .iter()
            .enumerate()
            .find(|(_, column)| column.len() != n_points)
        {
            return Err(GridError::InvalidArgument(format!(
                "column {} has {} values, expected {}",
                dim,
                column.len(),
                n_points
            )));
        }
        {
            let _guard = self.lock.write();
            let mut columns = self.columns.write();
            let mut axes = self.axes.write();
            for (dim, column) in columns_new.iter().enumerate() {
                columns[dim].extend_from_slice(column);
                axes[dim].add_all(column);
            }
        }
        self.listeners.fire(&DataSetEvent::added(format!("extend by {}", n_points)))
    }

    /// Replace point `index`; `index == data_count()` appends
    pub fn set(&self, index: usize, point: &[f64]) -> GridResult<()> {
        self.check_width(point)?;
        {
            let _guard = self.lock.write();
            let mut columns = self.columns.write();
            let count = count_of(&columns);
            if index > count {
                return Err(GridError::IndexOutOfBounds {
                    dim: 0,
                    index,
                    len: count,
                });
            }
            for (column, &value) in columns.iter_mut().zip(point) {
                if index == count {
                    column.push(value);
                } else {
                    column[index] = value;
                }
            }
            refresh_axes(&columns, &mut self.axes.write());
        }
        self.listeners.fire(&DataSetEvent::updated("set"))
    }

    /// Remove the points in `from..to`
    pub fn remove(&self, from: usize, to: usize) -> GridResult<()> {
        {
            let _guard = self.lock.write();
            let mut columns = self.columns.write();
            let count = count_of(&columns);
            if to > count {
                return Err(GridError::IndexOutOfBounds {
                    dim: 0,
                    index: to,
                    len: count,
                });
            }
            if from > to {
                return Err(GridError::InvalidArgument(format!(
                    "from ({}) must not exceed to ({})",
                    from, to
                )));
            }
            for column in columns.iter_mut() {
                column.drain(from..to);
            }
            refresh_axes(&columns, &mut self.axes.write());
        }
        self.listeners.fire(&DataSetEvent::removed("remove"))
    }

    /// Remove all points
    pub fn clear(&self) -> GridResult<()> {
        {
            let _guard = self.lock.write();
            self.columns.write().iter_mut().for_each(Vec::clear);
            self.axes.write().iter_mut().for_each(AxisDescription::clear);
        }
        self.listeners.fire(&DataSetEvent::removed("clear"))
    }

    fn check_width(&self, point: &[f64]) -> GridResult<()> {
        if point.len() != self.dimension {
            return Err(GridError::InvalidArgument(format!(
                "point has {} coordinates, dataset has {} dimensions",
                point.len(),
                self.dimension
            )));
        }
        Ok(())
    }
}

fn count_of(columns: &[Vec<f64>]) -> usize {
    columns.first().map(Vec::len).unwrap_or(0)
}

fn refresh_axes(columns: &[Vec<f64>], axes: &mut [AxisDescription]) {
    for (axis, column) in axes.iter_mut().zip(columns) {
        axis.clear();
        axis.add_all(column);
    }
}

impl DataSet for MultiDimDoubleDataSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn data_count(&self) -> usize {
        count_of(&self.columns.read())
    }

    fn data_count_in(&self, dim: usize) -> GridResult<usize> {
        validation::check_dimension(dim, self.dimension)?;
        Ok(self.columns.read()[dim].len())
    }

    fn get(&self, dim: usize, index: usize) -> GridResult<f64> {
        validation::check_dimension(dim, self.dimension)?;
        let columns = self.columns.read();
        validation::check_index(dim, index, columns[dim].len())?;
        Ok(columns[dim][index])
    }

    /// Assumes the dimension is sorted ascending (e.g. a time axis)
    fn index_of(&self, dim: usize, value: f64) -> GridResult<usize> {
        validation::check_dimension(dim, self.dimension)?;
        Ok(nearest_index(&self.columns.read()[dim], value))
    }

    fn axis_description(&self, dim: usize) -> GridResult<AxisDescription> {
        validation::check_dimension(dim, self.dimension)?;
        Ok(self.axes.read()[dim].clone())
    }

    fn recompute_limits(&self, dim: usize) -> GridResult<AxisDescription> {
        validation::check_dimension(dim, self.dimension)?;
        let columns = self.columns.read();
        let mut axes = self.axes.write();
        axes[dim].clear();
        axes[dim].add_all(&columns[dim]);
        Ok(axes[dim].clone())
    }

    fn lock(&self) -> &DataSetLock {
        &self.lock
    }

    fn listeners(&self) -> &EventListeners {
        &self.listeners
    }

    fn values(&self, dim: usize) -> GridResult<Vec<f64>> {
        validation::check_dimension(dim, self.dimension)?;
        Ok(self.columns.read()[dim].clone())
    }
}
