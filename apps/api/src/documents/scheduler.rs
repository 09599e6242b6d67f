#![allow(dead_code)]

//! Cancelable delayed-task scheduling, keyed by document id.
//!
//! Scheduling a key that already has a pending task replaces the pending
//! task (trailing-edge debounce: only the last request within the window
//! runs). Cancellation only reaches tasks still inside their delay; once
//! the delay elapses the work itself is detached and runs to completion.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Default)]
pub struct SaveScheduler {
    pending: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

impl SaveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` after `delay`, replacing any task still pending for `key`.
    pub fn schedule<F>(&self, key: Uuid, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach: past this point the task is no longer cancelable.
            tokio::spawn(task);
        });

        let mut pending = self.pending.lock().expect("scheduler lock poisoned");
        if let Some(previous) = pending.insert(key, handle) {
            previous.abort();
        }
    }

    /// Cancels the task pending for `key`, if any. Returns whether a still
    /// unfired task existed.
    pub fn cancel(&self, key: Uuid) -> bool {
        let mut pending = self.pending.lock().expect("scheduler lock poisoned");
        match pending.remove(&key) {
            Some(handle) => {
                let live = !handle.is_finished();
                handle.abort();
                live
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let mut pending = self.pending.lock().expect("scheduler lock poisoned");
        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }

    /// Whether an unfired task exists for `key`.
    pub fn is_pending(&self, key: Uuid) -> bool {
        let pending = self.pending.lock().expect("scheduler lock poisoned");
        pending.get(&key).is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SaveScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
