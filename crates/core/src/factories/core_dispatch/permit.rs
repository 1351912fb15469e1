use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting admission token bounding the number of running workers.
#[derive(Debug, Clone)]
pub(super) struct PermitPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A granted admission. The slot is returned to the pool on drop.
#[derive(Debug)]
pub(super) struct Permit {
    _permit: OwnedSemaphorePermit,
}

impl PermitPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Take a permit if one is free right now. Never waits.
    pub fn try_acquire(&self) -> Option<Permit> {
        match self.semaphore.clone().try_acquire_owned() {
            Ok(permit) => Some(Permit { _permit: permit }),
            Err(err) => {
                tracing::trace!(
                    capacity = self.capacity,
                    "no permit available: {err}"
                );
                None
            }
        }
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn in_use(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }
}
