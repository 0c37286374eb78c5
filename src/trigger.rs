//! Coalescing periodic trigger
//!
//! A spawned timer task posts one wake-up per interval into a depth-1
//! channel. The timer never does I/O; the worker is the only actor that
//! touches sensors or the network. If a cycle overruns the interval, the
//! extra fire lands in the single slot (or is dropped when the slot is
//! already full), so at most one signal is ever outstanding and cycles
//! never run concurrently.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;

pub struct PeriodicTrigger {
    rx: mpsc::Receiver<()>,
    _task: JoinHandle<()>,
}

impl PeriodicTrigger {
    /// Start the timer task; the first signal arrives one full interval
    /// after startup.
    pub fn start(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // Created here rather than inside the task so the tick deadlines
        // are anchored at startup, not at the task's first poll.
        let mut ticker = interval(period);
        let task = tokio::spawn(async move {
            // The first tick of an interval completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                // Full slot means a cycle is still pending; coalesce.
                let _ = tx.try_send(());
            }
        });
        Self { rx, _task: task }
    }

    /// Block until the next cycle is requested
    ///
    /// Returns `None` only if the timer task is gone.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}
