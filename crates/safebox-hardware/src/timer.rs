//! Tokio-backed implementation of [`TimerService`].
//!
//! Each `start` spawns a task that sleeps for the requested duration and
//! then sends the event on an mpsc channel. The consumer owns the receiving
//! end and funnels fired events through the same code path as keypad input,
//! so a timeout never interleaves with a transition in flight.
//!
//! ```text
//! start(5s, ev) ──► [sleep task] ──5s──► tx.send(ev) ──► rx in control loop
//! cancel()      ──► task.abort()
//! ```
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use safebox_hardware::timer::SoftwareTimer;
//! use safebox_hardware::traits::TimerService;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (mut timer, mut fired) = SoftwareTimer::new("auto-lock");
//!     timer.start(Duration::from_millis(10), "timeout");
//!
//!     assert_eq!(fired.recv().await, Some("timeout"));
//! }
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::traits::TimerService;

/// Capacity of the fired-event channel.
const EVENT_CHANNEL_CAPACITY: usize = 8;

/// One-shot timer backed by a spawned tokio task.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct SoftwareTimer<E> {
    /// Timer name, used in logs.
    name: String,

    /// Sender cloned into each sleep task.
    event_tx: mpsc::Sender<E>,

    /// Currently armed sleep task.
    task: Option<JoinHandle<()>>,
}

impl<E: Send + 'static> SoftwareTimer<E> {
    /// Create a timer and the receiver its events arrive on.
    pub fn new(name: impl Into<String>) -> (Self, mpsc::Receiver<E>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let timer = Self {
            name: name.into(),
            event_tx,
            task: None,
        };
        (timer, event_rx)
    }

    /// Timer name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<E: Send + 'static> TimerService<E> for SoftwareTimer<E> {
    fn start(&mut self, duration: Duration, event: E) {
        self.cancel();

        debug!(timer = %self.name, duration_ms = duration.as_millis() as u64, "Timer armed");
        let tx = self.event_tx.clone();
        let name = self.name.clone();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            trace!(timer = %name, "Timer fired");
            // Receiver gone means the control loop has stopped
            let _ = tx.send(event).await;
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!(timer = %self.name, "Timer cancelled");
            }
            task.abort();
        }
    }

    fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl<E> Drop for SoftwareTimer<E> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
