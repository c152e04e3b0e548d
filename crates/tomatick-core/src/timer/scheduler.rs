//! Tick scheduling port.
//!
//! The engine never sleeps or spawns anything itself. It asks a
//! [`TickScheduler`] for a periodic subscription when it starts running and
//! cancels it when it stops. The host delivers each tick back to the engine
//! together with the [`TickHandle`] it belongs to; ticks carrying a handle
//! that is no longer active are dropped by the engine.

use std::collections::VecDeque;
use std::time::Duration;

/// Nominal tick period.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How many cancelled handles a [`ManualScheduler`] remembers.
const CANCEL_HISTORY: usize = 32;

/// Identifies one periodic subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Something that can deliver a tick every `interval` until cancelled.
pub trait TickScheduler {
    /// Arm a new periodic subscription.
    fn schedule(&mut self, interval: Duration) -> TickHandle;

    /// Stop a subscription. Cancelling an unknown handle is a no-op.
    fn cancel(&mut self, handle: TickHandle);
}

/// Deterministic scheduler driven by hand.
///
/// Nothing fires on its own; callers read [`ManualScheduler::armed`] and
/// feed the handle to the engine once per simulated second.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    next_id: u64,
    armed: Option<(TickHandle, Duration)>,
    cancelled: VecDeque<TickHandle>,
    cancel_count: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live subscription, if any.
    pub fn armed(&self) -> Option<TickHandle> {
        self.armed.map(|(handle, _)| handle)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.armed.map(|(_, interval)| interval)
    }

    /// The most recently cancelled handles, oldest first. Only the last
    /// few are kept, so a long simulation stays bounded.
    pub fn recently_cancelled(&self) -> impl Iterator<Item = TickHandle> + '_ {
        self.cancelled.iter().copied()
    }

    pub fn was_cancelled(&self, handle: TickHandle) -> bool {
        self.cancelled.contains(&handle)
    }

    /// Total number of `cancel` calls, including forgotten ones.
    pub fn cancel_count(&self) -> u64 {
        self.cancel_count
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.armed = Some((handle, interval));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.armed() == Some(handle) {
            self.armed = None;
        }
        if self.cancelled.len() == CANCEL_HISTORY {
            self.cancelled.pop_front();
        }
        self.cancelled.push_back(handle);
        self.cancel_count += 1;
    }
}
