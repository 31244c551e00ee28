//! Shared datasets for integration tests

#![allow(dead_code)]

use implore_grid::{DataSetHandle, DoubleDataSet3D, DoubleGridDataSet, MultiDimDoubleDataSet};

/// Install a tracing subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Grid `{1,2,3} x {4,5,6,7}` with values `1..=12`
pub fn grid_2d() -> DoubleGridDataSet {
    DoubleGridDataSet::new(
        "grid-2d",
        2,
        vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0, 7.0],
            (1..=12).map(f64::from).collect(),
        ],
    )
    .expect("valid 2-d grid")
}

/// Values of the 3-grid fixture, 24 samples
pub fn values_3d() -> Vec<f64> {
    vec![
        1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 0.0, -1.0, -2.0, -3.0, -4.0, -5.0, -6.0, -7.0,
        -8.0, -9.0, 11.0, 22.0, 33.0, 44.0, 55.0,
    ]
}

/// Grid `{1,2,3} x {4,5,6,7} x {0,8}` with one value dimension
pub fn grid_3d() -> DoubleGridDataSet {
    DoubleGridDataSet::new(
        "grid-3d",
        3,
        vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0, 7.0],
            vec![0.0, 8.0],
            values_3d(),
        ],
    )
    .expect("valid 3-d grid")
}

/// Three-column point dataset
pub fn points() -> MultiDimDoubleDataSet {
    MultiDimDoubleDataSet::from_columns(
        "points",
        vec![
            vec![0.5, 1.5, 2.5, 3.5],
            vec![10.0, 20.0, 30.0, 40.0],
            vec![-1.0, -2.0, -3.0, -4.0],
        ],
    )
    .expect("valid point columns")
}

/// Legacy surface with `nx = 4`, `ny = 5`
pub fn surface() -> DoubleDataSet3D {
    DoubleDataSet3D::new(
        "surface",
        vec![1.0, 2.0, 3.0, 4.0],
        vec![-3.0, -2.0, 0.0, 2.0, 4.0],
        vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
            vec![9.0, 10.0, 11.0, 12.0],
            vec![-1.0, -2.0, -3.0, -4.0],
            vec![1337.0, 2337.0, 4242.0, 2323.0],
        ],
    )
    .expect("valid surface")
}

pub fn grid_handle() -> DataSetHandle {
    DataSetHandle::grid(grid_3d())
}

pub fn points_handle() -> DataSetHandle {
    DataSetHandle::plain(points())
}
