//! Controllable time for page timers.
//!
//! A [`VirtualClock`] starts on real time. Timers scheduled in that mode fire
//! once enough wall-clock time has elapsed and the page settles. After
//! [`VirtualClock::install`] the clock is a counter starting at 0 that only
//! moves through [`VirtualClock::advance`], which fires due timers in
//! ascending `(due_at, order)` before returning.

use crate::error::{Result, TatError};
use std::time::Instant;
use tracing::trace;

/// Identifier returned when a timer is scheduled.
pub type TimerId = u64;

/// Where the clock reads "now" from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Milliseconds elapsed since the clock was created.
    Real { origin: Instant },
    /// Simulated milliseconds, moved only by `advance`.
    Virtual { now_ms: u64 },
}

/// A pending timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer<T> {
    pub id: TimerId,
    pub due_at: u64,
    order: u64,
    pub task: T,
}

/// Timer queue plus the time source it is measured against.
#[derive(Debug)]
pub struct VirtualClock<T> {
    source: TimeSource,
    queue: Vec<Timer<T>>,
    next_id: TimerId,
    next_order: u64,
    step_limit: usize,
}

impl<T> VirtualClock<T> {
    /// Create a clock on real time.
    pub fn new(step_limit: usize) -> Self {
        Self {
            source: TimeSource::Real {
                origin: Instant::now(),
            },
            queue: Vec::new(),
            next_id: 1,
            next_order: 0,
            step_limit,
        }
    }

    /// Current time in milliseconds on the active source.
    pub fn now_ms(&self) -> u64 {
        match self.source {
            TimeSource::Real { origin } => origin.elapsed().as_millis() as u64,
            TimeSource::Virtual { now_ms } => now_ms,
        }
    }

    /// Whether `install` has been called.
    pub fn is_installed(&self) -> bool {
        matches!(self.source, TimeSource::Virtual { .. })
    }

    /// Switch to virtual time fixed at 0.
    ///
    /// Pending timers keep their remaining delay. Installing twice is a no-op.
    pub fn install(&mut self) {
        if self.is_installed() {
            return;
        }
        let now = self.now_ms();
        for timer in &mut self.queue {
            timer.due_at = timer.due_at.saturating_sub(now);
        }
        self.source = TimeSource::Virtual { now_ms: 0 };
        trace!(pending = self.queue.len(), "clock installed");
    }

    /// Schedule `task` to run `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let order = self.next_order;
        self.next_order += 1;
        let due_at = self.now_ms().saturating_add(delay_ms);
        trace!(id, due_at, delay_ms, "timer scheduled");
        self.queue.push(Timer {
            id,
            due_at,
            order,
            task,
        });
        id
    }

    /// Cancel a pending timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|timer| timer.id != id);
        before != self.queue.len()
    }

    /// Cancel every pending timer whose task matches `pred`.
    pub fn cancel_where(&mut self, pred: impl Fn(&T) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|timer| !pred(&timer.task));
        before - self.queue.len()
    }

    /// Number of timers not yet fired.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// True while real-time timers are pending, i.e. waiting can change state.
    pub fn has_pending_real_timers(&self) -> bool {
        !self.is_installed() && !self.queue.is_empty()
    }

    /// Move virtual time forward by `delta_ms`, firing every timer due on the way.
    ///
    /// `fire` receives the clock so a firing timer can schedule more timers;
    /// those fire in the same call if they fall inside the window.
    pub fn advance<F>(&mut self, delta_ms: u64, fire: F) -> Result<usize>
    where
        F: FnMut(&mut Self, T) -> Result<()>,
    {
        let TimeSource::Virtual { now_ms } = self.source else {
            return Err(TatError::Clock(
                "advance requires an installed clock".to_string(),
            ));
        };
        let target = now_ms.saturating_add(delta_ms);
        let fired = self.fire_until(target, true, fire)?;
        self.source = TimeSource::Virtual { now_ms: target };
        trace!(from = now_ms, to = target, fired, "clock advanced");
        Ok(fired)
    }

    /// Fire timers already due at the current time without moving the clock.
    pub fn run_due<F>(&mut self, fire: F) -> Result<usize>
    where
        F: FnMut(&mut Self, T) -> Result<()>,
    {
        let now = self.now_ms();
        self.fire_until(now, false, fire)
    }

    fn fire_until<F>(&mut self, limit: u64, move_clock: bool, mut fire: F) -> Result<usize>
    where
        F: FnMut(&mut Self, T) -> Result<()>,
    {
        let mut steps = 0usize;
        while let Some(idx) = self.next_due_index(limit) {
            steps += 1;
            if steps > self.step_limit {
                return Err(TatError::TimerStepLimit {
                    limit: self.step_limit,
                    target_ms: limit,
                });
            }
            let timer = self.queue.remove(idx);
            if move_clock {
                self.source = TimeSource::Virtual {
                    now_ms: timer.due_at,
                };
            }
            trace!(id = timer.id, due_at = timer.due_at, "timer fired");
            fire(self, timer.task)?;
        }
        Ok(steps)
    }

    fn next_due_index(&self, limit: u64) -> Option<usize> {
        self.queue
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_at <= limit)
            .min_by_key(|(_, timer)| (timer.due_at, timer.order))
            .map(|(idx, _)| idx)
    }
}
