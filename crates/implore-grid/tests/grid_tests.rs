//! Grid dataset integration tests
//!
//! Canonical indexing, construction validation and the legacy adapter.

mod common;

use std::sync::Arc;

use common::fixtures::{grid_2d, grid_3d, init_tracing, surface, values_3d};
use implore_grid::{
    ConstructionError, DataSet, DataSet3D, DoubleGridDataSet, GridDataSet, GridError,
    GridShape, LegacyGridAdapter, DIM_X, DIM_Y, DIM_Z,
};
use proptest::prelude::*;

// === Canonical Indexing ===

#[test]
fn test_two_grid_end_to_end() {
    init_tracing();
    let ds = grid_2d();
    assert_eq!(ds.n_grid(), 2);
    assert_eq!(ds.dimension(), 3);
    assert_eq!(ds.data_count(), 12);
    assert_eq!(ds.get(0, 7), Ok(2.0));
    assert_eq!(ds.get(1, 7), Ok(6.0));
    assert_eq!(ds.get(2, 7), Ok(8.0));
    assert_eq!(ds.value(2, &[2, 0]), Ok(3.0));
    assert_eq!(ds.value(1, &[0, 2, 1]), Ok(6.0));
}

#[test]
fn test_three_grid_end_to_end() {
    init_tracing();
    let ds = grid_3d();
    assert_eq!(ds.n_grid(), 3);
    assert_eq!(ds.data_count(), 24);
    assert_eq!(ds.get(0, 7), Ok(2.0));
    assert_eq!(ds.get(1, 7), Ok(6.0));
    assert_eq!(ds.get(2, 7), Ok(0.0));
    assert_eq!(ds.get(3, 7), Ok(8.0));
    assert_eq!(ds.value(3, &[2, 0]), Ok(3.0));
    assert_eq!(ds.value(3, &[1, 3, 1]), Ok(44.0));
    assert_eq!(ds.value(1, &[0, 2, 1]), Ok(6.0));
}

#[test]
fn test_grid_accessors() {
    let ds = grid_3d();
    assert_eq!(ds.grid(1, 3), Ok(7.0));
    assert_eq!(ds.grid_values(2), Ok(vec![0.0, 8.0]));
    assert_eq!(ds.data_count_in(1), Ok(4));
    assert_eq!(ds.index_of(1, 5.6), Ok(2));
    assert!(matches!(
        ds.grid(3, 0),
        Err(GridError::NotAGridDimension { dim: 3, n_grid: 3 })
    ));
    assert!(matches!(
        ds.index_of(3, 1.0),
        Err(GridError::NotAGridDimension { .. })
    ));
    assert!(matches!(
        ds.get(0, 24),
        Err(GridError::IndexOutOfBounds { .. })
    ));
    assert!(matches!(
        ds.value(3, &[3, 0, 0]),
        Err(GridError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn test_recompute_limits() {
    let ds = grid_3d();
    let grid_axis = ds.recompute_limits(1).unwrap();
    assert_eq!((grid_axis.min, grid_axis.max), (4.0, 7.0));
    let value_axis = ds.recompute_limits(3).unwrap();
    assert_eq!((value_axis.min, value_axis.max), (-9.0, 55.0));
    assert_eq!(ds.axis_description(3).unwrap(), value_axis);
}

proptest! {
    #[test]
    fn test_canonical_round_trip(lens in prop::collection::vec(1usize..6, 1..4)) {
        let shape = GridShape::new(&lens);
        for flat in 0..shape.size() {
            let indices = shape.decanonicalize(flat).unwrap();
            prop_assert_eq!(shape.canonicalize(&indices).unwrap(), flat);
        }
    }
}

// === Construction ===

#[test]
fn test_inconsistent_shape_names_counts() {
    let mut values = values_3d();
    values.pop();
    let err = DoubleGridDataSet::new(
        "short",
        3,
        vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0, 7.0],
            vec![0.0, 8.0],
            values,
        ],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        GridError::Construction(ConstructionError::InconsistentShape {
            expected: 24,
            actual: 23,
            ..
        })
    ));
    let message = err.to_string();
    assert!(message.contains("24"), "{}", message);
    assert!(message.contains("23"), "{}", message);
}

#[test]
fn test_too_many_grid_dimensions() {
    let err = DoubleGridDataSet::new(
        "no-values",
        4,
        vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0, 7.0],
            vec![0.0, 8.0],
            values_3d(),
        ],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        GridError::Construction(ConstructionError::TooFewDimensions {
            dimension: 4,
            n_grid: 4
        })
    ));
}

#[test]
fn test_builder_matches_constructor() {
    let built = DoubleGridDataSet::builder("built")
        .with_grid_axis(vec![1.0, 2.0, 3.0])
        .with_grid_axis(vec![4.0, 5.0, 6.0, 7.0])
        .with_value_dimension((1..=12).map(f64::from).collect::<Vec<_>>())
        .with_axis_label(2, "intensity", Some("counts"))
        .build()
        .unwrap();
    let reference = grid_2d();
    for flat in 0..12 {
        for dim in 0..3 {
            assert_eq!(built.get(dim, flat), reference.get(dim, flat));
        }
    }
    let axis = built.axis_description(2).unwrap();
    assert_eq!(axis.full_label(), "intensity [counts]");
}

// === Legacy Adapter ===

#[test]
fn test_legacy_convention_pinned() {
    let legacy = Arc::new(surface());
    let adapter = LegacyGridAdapter::new(legacy.clone());
    assert_eq!(adapter.get(DIM_Z, 18), legacy.z(2, 4));
    assert_eq!(legacy.get(DIM_Z, 18), Ok(4242.0));
    assert_eq!(adapter.value(DIM_Z, &[2, 4]), Ok(4242.0));
    assert_eq!(adapter.get(DIM_X, 7), Ok(4.0));
    assert_eq!(adapter.get(DIM_Y, 7), Ok(-2.0));
    assert!(matches!(
        adapter.value(DIM_Z, &[2]),
        Err(GridError::InvalidArgument(_))
    ));
}

#[test]
fn test_legacy_forwards_metadata() {
    let adapter = LegacyGridAdapter::new(Arc::new(surface()));
    assert_eq!(adapter.name(), "surface");
    assert_eq!(adapter.data_count(), 20);
    assert_eq!(adapter.data_count_in(DIM_Y), Ok(5));
    assert_eq!(adapter.index_of(DIM_Y, -0.5), Ok(2));
    let z_axis = adapter.recompute_limits(DIM_Z).unwrap();
    assert_eq!((z_axis.min, z_axis.max), (-4.0, 4242.0));
}
