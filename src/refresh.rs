/// Cooperative refresh scheduling.
///
/// Single-threaded event loop: an mpsc receiver doubles as the timer
/// (`recv_timeout` with the refresh interval) and the manual-trigger
/// channel. A timeout means the scheduled tick fired; a `Manual` message
/// preempts the wait and starts a cycle immediately; `Shutdown` or a
/// disconnected channel ends the loop cleanly.
///
/// Each cycle runs to completion before the next trigger is honored, so
/// there is never more than one in-flight fetch per session. A hung request
/// simply occupies its cycle until the HTTP client's own timeout fires.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// Why a refresh cycle is starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The interval timer elapsed (or this is the initial cycle at startup).
    Scheduled,
    /// A user action (the Force Reconnect control) requested an immediate
    /// refresh, bypassing the timer.
    Manual,
    /// Stop the loop.
    Shutdown,
}

/// Cloneable handle for requesting refreshes from outside the loop
/// (e.g. the stdin reader thread).
#[derive(Clone)]
pub struct ManualTrigger {
    tx: Sender<Trigger>,
}

impl ManualTrigger {
    /// Requests an immediate refresh. Returns false if the loop is gone.
    pub fn fire(&self) -> bool {
        self.tx.send(Trigger::Manual).is_ok()
    }

    /// Asks the loop to exit after the current cycle.
    pub fn shutdown(&self) -> bool {
        self.tx.send(Trigger::Shutdown).is_ok()
    }
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// The refresh scheduler: owns the trigger channel and the tick cadence.
pub struct RefreshLoop {
    interval: Duration,
    rx: Receiver<Trigger>,
    tx: Sender<Trigger>,
}

impl RefreshLoop {
    pub fn new(interval: Duration) -> Self {
        let (tx, rx) = channel();
        RefreshLoop { interval, rx, tx }
    }

    /// Returns a handle that can preempt the timer from another thread.
    pub fn manual_trigger(&self) -> ManualTrigger {
        ManualTrigger { tx: self.tx.clone() }
    }

    /// Runs the loop, invoking `tick` once per cycle with the trigger that
    /// started it. An initial `Scheduled` cycle runs before the first wait
    /// so the panel is populated at startup.
    ///
    /// Consumes the loop: dropping the internal sender on exit lets any
    /// remaining `ManualTrigger` holders observe the shutdown via `fire()`.
    pub fn run<F>(self, mut tick: F)
    where
        F: FnMut(Trigger),
    {
        tick(Trigger::Scheduled);

        loop {
            match self.rx.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => tick(Trigger::Scheduled),
                Ok(Trigger::Manual) => tick(Trigger::Manual),
                Ok(Trigger::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                // The loop never sends Scheduled over the channel; treat a
                // stray one as a manual request rather than dropping it.
                Ok(Trigger::Scheduled) => tick(Trigger::Manual),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
