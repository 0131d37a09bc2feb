//! Time sources for the playback loop.
//!
//! The engine never reads the clock itself: a driver asks a [`Clock`] for the time
//! and hands it to [`Ticker::on_tick`]. A display loop uses [`SystemClock`]; tests
//! step a [`ManualClock`].

use std::{cell::Cell, time::Instant};

use crate::{launch::LaunchEvent, nav::Advance};

pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Must never go backwards.
    fn now_ms(&self) -> u64;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) -> u64 {
        let next = self.now.get() + ms;
        self.now.set(next);
        next
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms.max(self.now.get()));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// What happened during one frame callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub advance: Option<Advance>,
    pub launch: Option<LaunchEvent>,
    pub saved: bool,
}

impl TickReport {
    pub fn advanced(&self) -> bool {
        self.advance.is_some()
    }

    pub fn finished(&self) -> bool {
        self.advance == Some(Advance::EndOfContent)
    }
}

/// Something driven once per display frame.
pub trait Ticker {
    fn on_tick(&mut self, now_ms: u64) -> TickReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_only_moves_forward() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.advance(16), 116);
        clock.set(50);
        assert_eq!(clock.now_ms(), 116);
        clock.set(200);
        assert_eq!(clock.now_ms(), 200);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
