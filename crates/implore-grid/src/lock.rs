//! Reentrant read/write lock shared by a dataset and all of its views
//!
//! The lock guards the consistency domain of one storage-owning dataset.
//! Mutators hold a [`DataSetWriteGuard`] for their whole critical section;
//! consumers that need several reads to agree (e.g. iterating a grid while
//! another thread edits it) hold a [`DataSetReadGuard`].
//!
//! A thread already holding the write guard may acquire further write or read
//! guards; those nested guards do not touch the underlying lock. Read guards
//! use recursive acquisition so a thread never deadlocks on its own reads.

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, ThreadId};

#[derive(Debug, Default)]
struct WriterState {
    owner: Option<ThreadId>,
    depth: usize,
}

/// Read/write lock of one dataset
#[derive(Debug, Default)]
pub struct DataSetLock {
    raw: RwLock<()>,
    writer: Mutex<WriterState>,
}

impl DataSetLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire shared access, blocking while another thread writes
    pub fn read(&self) -> DataSetReadGuard<'_> {
        if self.held_by_current_thread() {
            return DataSetReadGuard { _inner: None };
        }
        DataSetReadGuard {
            _inner: Some(self.raw.read_recursive()),
        }
    }

    /// Acquire exclusive access, blocking until all other holders release.
    ///
    /// Upgrading is not supported: calling this while the same thread holds
    /// only a read guard deadlocks.
    pub fn write(&self) -> DataSetWriteGuard<'_> {
        let me = thread::current().id();
        {
            let mut writer = self.writer.lock();
            if writer.owner == Some(me) {
                writer.depth += 1;
                return DataSetWriteGuard {
                    lock: self,
                    inner: None,
                };
            }
        }

        let inner = self.raw.write();
        let mut writer = self.writer.lock();
        writer.owner = Some(me);
        writer.depth = 1;
        DataSetWriteGuard {
            lock: self,
            inner: Some(inner),
        }
    }

    /// Try to acquire exclusive access without blocking
    pub fn try_write(&self) -> Option<DataSetWriteGuard<'_>> {
        if self.held_by_current_thread() {
            return Some(self.write());
        }
        let inner = self.raw.try_write()?;
        let mut writer = self.writer.lock();
        writer.owner = Some(thread::current().id());
        writer.depth = 1;
        Some(DataSetWriteGuard {
            lock: self,
            inner: Some(inner),
        })
    }

    /// Check if the calling thread holds the write guard
    pub fn held_by_current_thread(&self) -> bool {
        self.writer.lock().owner == Some(thread::current().id())
    }

    /// Check if any thread holds the write guard
    pub fn is_write_locked(&self) -> bool {
        self.raw.is_locked_exclusive()
    }
}

/// Shared access to a dataset; released on drop
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct DataSetReadGuard<'a> {
    _inner: Option<RwLockReadGuard<'a, ()>>,
}

/// Exclusive access to a dataset; released on drop
///
/// Nested guards acquired by the owning thread must be dropped before the
/// outermost one, which scoping guarantees.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct DataSetWriteGuard<'a> {
    lock: &'a DataSetLock,
    inner: Option<RwLockWriteGuard<'a, ()>>,
}

impl Drop for DataSetWriteGuard<'_> {
    fn drop(&mut self) {
        let mut writer = self.lock.writer.lock();
        writer.depth = writer.depth.saturating_sub(1);
        if self.inner.is_some() {
            writer.owner = None;
            writer.depth = 0;
        }
        // `inner` drops after the owner is cleared, releasing the raw lock
    }
}
