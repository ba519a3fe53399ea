//! Application state shared across request handlers.

use std::sync::{Arc, Mutex, PoisonError};

use estagios_vagas::{RecordStore, StoreError, WorkflowController};

/// The workflow controller over a type-erased record store.
pub type Controller = WorkflowController<Box<dyn RecordStore + Send>>;

/// Shared application state.
///
/// This is passed to all request handlers via Axum's state extractor. The
/// controller sits behind one mutex, so requests are handled one at a time
/// and each runs to completion before the next starts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    controller: Mutex<Controller>,
}

impl AppState {
    /// Create a new application state owning `store`.
    pub fn new(store: Box<dyn RecordStore + Send>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                controller: Mutex::new(WorkflowController::new(store)),
            }),
        }
    }

    /// Run `f` with exclusive access to the controller.
    ///
    /// Store calls are atomic, so a panic in another request cannot leave
    /// the controller half-updated and a poisoned lock is taken over.
    pub fn with_controller<T>(&self, f: impl FnOnce(&mut Controller) -> T) -> T {
        let mut controller = self
            .inner
            .controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut controller)
    }

    /// Check that the record store is reachable.
    pub fn health_check(&self) -> Result<(), StoreError> {
        self.with_controller(|controller| controller.store().health_check())
    }
}
