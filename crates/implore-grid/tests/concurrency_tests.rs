//! Locking and change notification across threads

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use common::fixtures::{grid_3d, grid_handle, init_tracing, points, surface};
use implore_grid::{
    DataSet, DataSetEvent, DataSetHandle, EventKind, GridError, LegacyGridAdapter,
    ListenerError, TransposedDataSet,
};
use parking_lot::Mutex;

#[test]
fn test_writer_excludes_readers() {
    init_tracing();
    let ds = Arc::new(points());
    let writing = Arc::new(AtomicBool::new(false));
    let ready = Arc::new(Barrier::new(2));

    let writer = {
        let ds = Arc::clone(&ds);
        let writing = Arc::clone(&writing);
        let ready = Arc::clone(&ready);
        thread::spawn(move || {
            let _guard = ds.lock().write();
            writing.store(true, Ordering::SeqCst);
            ready.wait();
            thread::sleep(Duration::from_millis(50));
            writing.store(false, Ordering::SeqCst);
        })
    };

    ready.wait();
    {
        let _read = ds.lock().read();
        assert!(!writing.load(Ordering::SeqCst));
    }
    writer.join().unwrap();
}

#[test]
fn test_readers_share_the_lock() {
    let ds = Arc::new(points());
    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ds = Arc::clone(&ds);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let _read = ds.lock().read();
                // all four readers hold the lock at once
                barrier.wait();
                ds.get(1, 2).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 30.0);
    }
}

#[test]
fn test_nested_guards_and_mutation_under_lock() {
    let ds = points();
    let _outer = ds.lock().write();
    let _read = ds.lock().read();
    ds.add(&[4.5, 50.0, -5.0]).unwrap();
    assert_eq!(ds.data_count(), 5);
}

#[test]
fn test_failed_mutation_releases_lock() {
    let ds = points();
    assert!(matches!(
        ds.add(&[1.0]),
        Err(GridError::InvalidArgument(_))
    ));
    assert!(!ds.lock().is_write_locked());
    assert!(ds.lock().try_write().is_some());
    assert_eq!(ds.data_count(), 4);
}

#[test]
fn test_listeners_run_after_commit_in_order() {
    let ds = Arc::new(points());
    let log = Arc::new(Mutex::new(Vec::new()));

    for tag in ["first", "second"] {
        let log = Arc::clone(&log);
        let observed = Arc::downgrade(&ds);
        ds.listeners()
            .add(move |event: &DataSetEvent| -> Result<(), ListenerError> {
                let ds = observed.upgrade().ok_or("dataset dropped")?;
                // the write guard is released before listeners run
                assert!(!ds.lock().is_write_locked());
                log.lock().push((tag, event.kind, ds.data_count()));
                Ok(())
            });
    }

    ds.add(&[4.5, 50.0, -5.0]).unwrap();
    assert_eq!(
        *log.lock(),
        vec![
            ("first", EventKind::DataAdded, 5),
            ("second", EventKind::DataAdded, 5)
        ]
    );
}

#[test]
fn test_listener_failure_reported_after_commit() {
    let ds = points();
    let reached = Arc::new(AtomicBool::new(false));
    ds.listeners()
        .add(|_: &DataSetEvent| -> Result<(), ListenerError> { Err("rejected".into()) });
    {
        let reached = Arc::clone(&reached);
        ds.listeners()
            .add(move |_: &DataSetEvent| -> Result<(), ListenerError> {
                reached.store(true, Ordering::SeqCst);
                Ok(())
            });
    }

    let err = ds.remove(0, 2).unwrap_err();
    assert_eq!(
        err,
        GridError::ListenerFailed {
            failures: vec!["rejected".to_string()]
        }
    );
    assert!(reached.load(Ordering::SeqCst));
    assert_eq!(ds.data_count(), 2);
    assert_eq!(ds.get(0, 0), Ok(2.5));
}

#[test]
fn test_view_permutation_change_notifies_underlying_listeners() {
    let handle = grid_handle();
    let view = TransposedDataSet::transpose(handle.clone(), false).unwrap();
    let kinds = Arc::new(Mutex::new(Vec::new()));
    {
        let kinds = Arc::clone(&kinds);
        handle
            .as_data_set()
            .listeners()
            .add(move |event: &DataSetEvent| -> Result<(), ListenerError> {
                kinds.lock().push(event.kind);
                Ok(())
            });
    }

    view.set_permutation(&[1, 0, 2, 3]).unwrap();
    assert!(view.set_permutation(&[3, 0, 1, 2]).is_err());
    view.set_transposed(true).unwrap();
    assert_eq!(*kinds.lock(), vec![EventKind::AxisChanged; 2]);
    assert_eq!(view.permutation(), vec![0, 1, 2, 3]);
}

#[test]
fn test_view_readers_during_permutation_changes() {
    let view = Arc::new(TransposedDataSet::transpose(grid_handle(), false).unwrap());
    let reader = {
        let view = Arc::clone(&view);
        thread::spawn(move || {
            for _ in 0..200 {
                let value = view.get(3, 22).unwrap();
                assert_eq!(value, 44.0);
                let permutation = view.permutation();
                assert!(permutation == vec![0, 1, 2, 3] || permutation == vec![1, 0, 2, 3]);
            }
        })
    };
    for i in 0..200 {
        view.set_transposed(i % 2 == 0).unwrap();
    }
    reader.join().unwrap();
}

/// Run `recompute_limits(dim)` on a worker thread that holds a read guard
fn recompute_while_reading(data_set: Arc<dyn DataSet>, dim: usize) -> (f64, f64) {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _read = data_set.lock().read();
        let axis = data_set.recompute_limits(dim);
        let _ = tx.send(axis);
    });
    let axis = rx
        .recv_timeout(Duration::from_secs(2))
        .expect("recompute_limits blocked under a read guard")
        .unwrap();
    (axis.min, axis.max)
}

#[test]
fn test_recompute_limits_while_holding_read_guard() {
    assert_eq!(recompute_while_reading(Arc::new(grid_3d()), 3), (-9.0, 55.0));
    assert_eq!(recompute_while_reading(Arc::new(points()), 1), (10.0, 40.0));
    assert_eq!(recompute_while_reading(Arc::new(surface()), 1), (-3.0, 4.0));
    assert_eq!(
        recompute_while_reading(
            Arc::new(LegacyGridAdapter::new(Arc::new(surface()))),
            2
        ),
        (-4.0, 4242.0)
    );
    let view = TransposedDataSet::permute(DataSetHandle::grid(grid_3d()), &[2, 1, 0, 3]).unwrap();
    assert_eq!(recompute_while_reading(Arc::new(view), 0), (0.0, 8.0));
}
