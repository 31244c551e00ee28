//! Change notification for datasets
//!
//! Every storage-owning dataset carries an [`EventListeners`] registry.
//! After a mutation has committed and its write guard is released, the
//! dataset fires one [`DataSetEvent`]; listeners run synchronously on the
//! mutating thread in registration order.
//!
//! A listener that returns an error or panics does not stop the remaining
//! listeners and cannot undo the mutation. Its failure is collected and
//! handed back to the caller as [`GridError::ListenerFailed`].

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::error::{GridError, GridResult};

/// Kind of change a dataset reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    DataAdded,
    DataRemoved,
    DataUpdated,
    AxisChanged,
}

/// Notification sent to listeners after a committed mutation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataSetEvent {
    /// What changed
    pub kind: EventKind,

    /// Human readable description (e.g. "permutation changed")
    pub message: String,

    /// Affected dimension, if the change is confined to one
    pub dimension: Option<usize>,
}

impl DataSetEvent {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            dimension: None,
        }
    }

    pub fn added(message: impl Into<String>) -> Self {
        Self::new(EventKind::DataAdded, message)
    }

    pub fn removed(message: impl Into<String>) -> Self {
        Self::new(EventKind::DataRemoved, message)
    }

    pub fn updated(message: impl Into<String>) -> Self {
        Self::new(EventKind::DataUpdated, message)
    }

    pub fn axis_changed(message: impl Into<String>) -> Self {
        Self::new(EventKind::AxisChanged, message)
    }

    /// Restrict the event to one dimension
    pub fn with_dimension(mut self, dim: usize) -> Self {
        self.dimension = Some(dim);
        self
    }
}

/// Error returned by a listener
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl From<&str> for ListenerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for ListenerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Receiver of dataset change notifications
pub trait EventListener: Send + Sync {
    fn handle(&self, event: &DataSetEvent) -> Result<(), ListenerError>;
}

impl<F> EventListener for F
where
    F: Fn(&DataSetEvent) -> Result<(), ListenerError> + Send + Sync,
{
    fn handle(&self, event: &DataSetEvent) -> Result<(), ListenerError> {
        self(event)
    }
}

/// Handle returned on registration, used to remove a listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered registry of listeners of one dataset
pub struct EventListeners {
    listeners: RwLock<Vec<(ListenerId, Arc<dyn EventListener>)>>,
    next_id: AtomicU64,
    auto_notify: AtomicBool,
}

impl EventListeners {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            auto_notify: AtomicBool::new(true),
        }
    }

    /// Register a listener; it runs after all previously registered ones
    pub fn add(&self, listener: impl EventListener + 'static) -> ListenerId {
        self.add_arc(Arc::new(listener))
    }

    /// Register a shared listener
    pub fn add_arc(&self, listener: Arc<dyn EventListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(other, _)| *other != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Whether mutations notify listeners
    pub fn auto_notify(&self) -> bool {
        self.auto_notify.load(Ordering::Acquire)
    }

    /// Enable or disable notification; returns the previous setting
    pub fn set_auto_notify(&self, enabled: bool) -> bool {
        self.auto_notify.swap(enabled, Ordering::AcqRel)
    }

    /// Deliver `event` to every listener in registration order.
    ///
    /// The registry is snapshotted first, so listeners may register or remove
    /// listeners without deadlocking; such changes apply to the next event.
    pub fn fire(&self, event: &DataSetEvent) -> GridResult<()> {
        if !self.auto_notify() {
            return Ok(());
        }
        let snapshot: Vec<Arc<dyn EventListener>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        let mut failures = Vec::new();
        for listener in snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.handle(event)));
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err.0,
                Err(payload) => panic_message(payload.as_ref()),
            };
            tracing::warn!("Listener failed on {:?} event: {}", event.kind, failure);
            failures.push(failure);
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(GridError::ListenerFailed { failures })
        }
    }
}

impl Default for EventListeners {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListeners")
            .field("len", &self.len())
            .field("auto_notify", &self.auto_notify())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("listener panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("listener panicked: {}", message)
    } else {
        "listener panicked".to_string()
    }
}
