//! Flush scheduling for pending classes
//!
//! The processor never owns a timer. It asks a [`Scheduler`] to schedule a
//! flush and the scheduler answers either [`Schedule::Now`] (flush
//! synchronously) or [`Schedule::Deferred`] (the host calls
//! [`IncrementalProcessor::poll`](super::processor::IncrementalProcessor::poll)
//! from its own loop until the flush is due).
//!
//! - [`ImmediateScheduler`] - always `Now`; for batch and server-side use
//! - [`DebounceScheduler`] - trailing-edge debounce; every new schedule call
//!   cancels and restarts the window

use std::time::{Duration, Instant};

/// Answer to a schedule request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Flush right away
    Now,
    /// A flush is pending; poll until due
    Deferred,
}

/// A single-shot, cancel-and-reschedule flush timer
pub trait Scheduler {
    /// (Re)schedule a flush `delay` from now, replacing any outstanding one
    fn schedule(&mut self, delay: Duration) -> Schedule;

    /// Cancel the outstanding flush, if any
    fn cancel(&mut self);

    /// Is an outstanding flush due at `now`?
    fn is_due(&self, now: Instant) -> bool;

    /// When the outstanding flush is due
    fn deadline(&self) -> Option<Instant> {
        None
    }
}

/// Flushes synchronously
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&mut self, _delay: Duration) -> Schedule {
        Schedule::Now
    }

    fn cancel(&mut self) {}

    fn is_due(&self, _now: Instant) -> bool {
        false
    }
}

/// Trailing-edge debounce
#[derive(Debug, Clone, Copy, Default)]
pub struct DebounceScheduler {
    deadline: Option<Instant>,
}

impl DebounceScheduler {
    /// Create an idle scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule relative to an explicit instant
    pub fn schedule_at(&mut self, now: Instant, delay: Duration) -> Schedule {
        self.deadline = Some(now + delay);
        Schedule::Deferred
    }

    /// Check whether a flush is outstanding
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Scheduler for DebounceScheduler {
    fn schedule(&mut self, delay: Duration) -> Schedule {
        self.schedule_at(Instant::now(), delay)
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
