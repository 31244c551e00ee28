//! implore-grid - Grid dataset engine for scientific plotting
//!
//! This crate stores multidimensional numeric data for renderers and
//! analysis plugins. Data lives either as independent points or on a
//! cartesian grid, and can be looked at through permuted views without
//! copying.
//!
//! # Key Components
//!
//! - **DataSet / GridDataSet**: Read contracts every consumer couples to
//! - **DoubleGridDataSet**: Immutable grid storage with canonical indexing
//! - **MultiDimDoubleDataSet**: Editable point storage, one column per dimension
//! - **TransposedDataSet**: Dimension-permuted view, grid aware
//! - **LegacyGridAdapter**: Grid view of legacy x/y/z datasets
//! - **DataSetLock / EventListeners**: Consistency domain and change notification
//!
//! # Canonical Indexing
//!
//! Grid points are numbered mixed-radix with dimension 0 varying fastest:
//! for grid lengths `n0, n1, ...` the point `(i0, i1, ...)` has flat index
//! `i0 + n0 * (i1 + n1 * (...))`. Every value dimension stores exactly one
//! sample per grid point in this order.
//!
//! # Features
//!
//! - `parallel`: scan value dimensions with rayon when recomputing limits

pub mod axis;
pub mod dataset;
pub mod error;
pub mod event;
pub mod grid;
pub mod index;
pub mod legacy;
pub mod lock;
pub mod multi_dim;
pub mod transposed;

pub use axis::AxisDescription;
pub use dataset::*;
pub use error::{ConstructionError, GridError, GridResult, PermutationError};
pub use event::{
    DataSetEvent, EventKind, EventListener, EventListeners, ListenerError, ListenerId,
};
pub use grid::{DoubleGridDataSet, GridDataSetBuilder};
pub use index::{nearest_index, GridShape};
pub use legacy::{DoubleDataSet3D, LegacyGridAdapter};
pub use lock::{DataSetLock, DataSetReadGuard, DataSetWriteGuard};
pub use multi_dim::MultiDimDoubleDataSet;
pub use transposed::TransposedDataSet;
