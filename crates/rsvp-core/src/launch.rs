//! Launch mode: a 3-2-1 countdown followed by a speed ramp up to the target WPM.

use crate::types::MIN_WPM;

pub const RAMP_DURATION_MS: u64 = 12_000;
pub const START_WPM: u16 = MIN_WPM;
pub const COUNTDOWN_FROM: u8 = 3;
pub const COUNTDOWN_STEP_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    Inert,
    CountingDown(u8),
    Ramping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchEvent {
    CountdownStep(u8),
    RampStarted,
    RampCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchState {
    pub is_launching: bool,
    pub countdown: u8,
    pub current_wpm: u16,
    pub target_wpm: u16,
    pub ramp_start_ms: Option<u64>,
    /// Deadline for the next countdown step; set by the first tick after launch.
    pub(crate) next_step_ms: Option<u64>,
}

impl Default for LaunchState {
    fn default() -> Self {
        Self::inert()
    }
}

impl LaunchState {
    pub fn inert() -> Self {
        Self {
            is_launching: false,
            countdown: 0,
            current_wpm: START_WPM,
            target_wpm: START_WPM,
            ramp_start_ms: None,
            next_step_ms: None,
        }
    }

    pub(crate) fn begin(target_wpm: u16) -> Self {
        Self {
            is_launching: true,
            countdown: COUNTDOWN_FROM,
            current_wpm: START_WPM,
            target_wpm,
            ramp_start_ms: None,
            next_step_ms: None,
        }
    }

    pub fn phase(&self) -> LaunchPhase {
        if !self.is_launching {
            LaunchPhase::Inert
        } else if self.countdown > 0 {
            LaunchPhase::CountingDown(self.countdown)
        } else {
            LaunchPhase::Ramping
        }
    }

    /// The ramp's WPM once it has actually started, if it has.
    pub fn ramp_wpm_override(&self) -> Option<u16> {
        match (self.is_launching, self.ramp_start_ms) {
            (true, Some(_)) => Some(self.current_wpm),
            _ => None,
        }
    }
}

/// Fraction of the ramp completed after `elapsed_ms`, in `[0, 1]`.
pub fn ramp_progress(elapsed_ms: u64) -> f64 {
    (elapsed_ms as f64 / RAMP_DURATION_MS as f64).min(1.0)
}

/// Ease-out ramp from [`START_WPM`] to `target_wpm`.
///
/// Rounds half away from zero, so 487.5 becomes 488.
pub fn ramp_wpm(target_wpm: u16, elapsed_ms: u64) -> u16 {
    let progress = ramp_progress(elapsed_ms);
    let eased = 1.0 - (1.0 - progress).powi(2);
    let start = f64::from(START_WPM);
    let wpm = start + (f64::from(target_wpm) - start) * eased;
    wpm.round().max(0.0) as u16
}
