//! Ordering gate shared between use cases.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Serializes a store mutation together with the pushes that report it.
///
/// Use cases that change the same state hold the same gate from the
/// mutation until the last notification is queued, so every connection
/// receives the reports in mutation order. Queueing never waits on a
/// socket, so the gate is held only briefly.
#[derive(Debug, Clone, Default)]
pub struct NotificationGate(Arc<Mutex<()>>);

impl NotificationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}
