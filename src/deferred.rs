//! Deferred-work queue.
//!
//! Radio events are handled synchronously inside the stack's callback, where
//! issuing further radio calls (re-advertising, passkey completion) is
//! unsafe. Handlers describe such work as a [`DeferredTask`] and the
//! cooperative runner drains the queue strictly after the triggering event
//! has returned.
//!
//! Deferred tasks are eventually-executed, not immediate: a disconnect
//! followed by a fast reconnect can interleave with the deferred
//! re-advertise. Once scheduled, a task always runs — there is no
//! cancellation.

use heapless::Deque;
use log::warn;

/// Maximum number of pending deferred tasks.
pub const DEFERRED_QUEUE_CAP: usize = 8;

/// Work that must run outside the radio event callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Resume advertising with the previously supplied payloads.
    Readvertise { interval_us: u32 },
    /// Complete a passkey-display pairing exchange.
    SubmitPasskey { conn_handle: u16 },
}

/// Bounded FIFO of deferred tasks.
pub struct DeferredQueue {
    queue: Deque<DeferredTask, DEFERRED_QUEUE_CAP>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self { queue: Deque::new() }
    }

    /// Enqueue `task`. Returns `false` if the queue is full and the task
    /// was dropped (surfaced to the log; the event path must not block).
    pub fn schedule(&mut self, task: DeferredTask) -> bool {
        if let Err(task) = self.queue.push_back(task) {
            warn!("deferred queue full, dropping {task:?}");
            return false;
        }
        true
    }

    /// Drain every pending task into `runner`, oldest first.
    pub fn drain(&mut self, mut runner: impl FnMut(DeferredTask)) {
        while let Some(task) = self.queue.pop_front() {
            runner(task);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}
