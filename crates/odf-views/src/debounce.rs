//! Debounced delivery of rapidly changing values.
//!
//! # Design
//! - Every pushed value cancels the pending timer and starts a new one.
//! - Only the value that survives a full quiet window reaches the receiver.
//! - A zero delay delivers immediately.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Timer that settles a burst of values into the last one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    tx: UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Debouncer with the given quiet window and the receiver settled values
    /// arrive on.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                pending: None,
                tx,
            },
            rx,
        )
    }

    /// Quiet window.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Submit a new value, replacing any value still waiting.
    pub fn push(&mut self, value: T) {
        self.cancel();
        if self.delay.is_zero() {
            let _ = self.tx.send(value);
            return;
        }
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(value);
        }));
    }

    /// Drop the waiting value, if any.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }

    /// Whether a value is waiting for its quiet window to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }
}
