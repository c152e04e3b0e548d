//! Wall-clock tick delivery on the tokio runtime.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tomatick_core::timer::TICK_INTERVAL;
use tomatick_core::{TickHandle, TickScheduler};

pub type TickReceiver = mpsc::UnboundedReceiver<TickHandle>;

/// Each subscription is a task on a `tokio::time::interval` that sends its
/// handle down a channel. The receiving loop passes the handle to the
/// engine, which drops anything from a cancelled subscription.
///
/// Must be used from inside a tokio runtime.
pub struct TokioScheduler {
    next_id: u64,
    tx: mpsc::UnboundedSender<TickHandle>,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                next_id: 0,
                tx,
                tasks: HashMap::new(),
            },
            rx,
        )
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule(&mut self, period: Duration) -> TickHandle {
        // `tokio::time::interval` panics on a zero period.
        let period = if period.is_zero() {
            tracing::warn!("zero tick interval requested, using the default");
            TICK_INTERVAL
        } else {
            period
        };
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of an interval completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
