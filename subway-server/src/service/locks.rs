//! Per-line mutual exclusion.
//!
//! A section change loads a line's full chain, edits it and saves it back.
//! Two such changes interleaving on one line would lose an update and
//! could leave a branch in the chain, so they take the line's lock for
//! the whole load-edit-save cycle. Different lines never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::LineId;

/// Lazily created lock per line.
#[derive(Debug, Default)]
pub(crate) struct LineLocks {
    locks: Mutex<HashMap<LineId, Arc<Mutex<()>>>>,
}

impl LineLocks {
    /// Wait for exclusive access to a line.
    pub(crate) async fn acquire(&self, line: LineId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(line).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry of a deleted line.
    pub(crate) async fn forget(&self, line: LineId) {
        self.locks.lock().await.remove(&line);
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
