use tracing::debug;

use crate::{
    clock::{TickReport, Ticker},
    delay::delay_for_chunk,
    launch::{
        ramp_progress, ramp_wpm, LaunchEvent, LaunchPhase, LaunchState, COUNTDOWN_STEP_MS,
        START_WPM,
    },
    nav::Advance,
    types::PlaybackState,
};

use super::Reader;

impl Ticker for Reader {
    /// One frame. Reads WPM, chunk size and launch state fresh every call, so live
    /// changes apply on the next frame.
    fn on_tick(&mut self, now_ms: u64) -> TickReport {
        let mut report = TickReport {
            launch: self.tick_launch(now_ms),
            ..TickReport::default()
        };

        if self.session.is_playing() {
            if let Some((advance, saved)) = self.tick_playback(now_ms) {
                report.advance = Some(advance);
                report.saved |= saved;
            }
        }

        report.saved |= self.tick_autosave(now_ms);
        report
    }
}

impl Reader {
    fn tick_launch(&mut self, now_ms: u64) -> Option<LaunchEvent> {
        let launch = &mut self.session.launch;
        match launch.phase() {
            LaunchPhase::Inert => None,
            LaunchPhase::CountingDown(remaining) => {
                let deadline = *launch.next_step_ms.get_or_insert(now_ms + COUNTDOWN_STEP_MS);
                if now_ms < deadline {
                    return None;
                }
                if remaining > 1 {
                    launch.countdown = remaining - 1;
                    launch.next_step_ms = Some(deadline + COUNTDOWN_STEP_MS);
                    debug!(countdown = launch.countdown, "launch countdown");
                    return Some(LaunchEvent::CountdownStep(launch.countdown));
                }
                launch.countdown = 0;
                launch.next_step_ms = None;
                launch.ramp_start_ms = Some(now_ms);
                launch.current_wpm = START_WPM;
                debug!(target_wpm = launch.target_wpm, "ramp started");
                self.session.playback = PlaybackState::Playing;
                self.last_advance_ms = None;
                Some(LaunchEvent::RampStarted)
            }
            LaunchPhase::Ramping => {
                let start = *launch.ramp_start_ms.get_or_insert(now_ms);
                let elapsed = now_ms.saturating_sub(start);
                launch.current_wpm = ramp_wpm(launch.target_wpm, elapsed);
                if ramp_progress(elapsed) >= 1.0 {
                    debug!(wpm = launch.current_wpm, "ramp completed");
                    *launch = LaunchState::inert();
                    return Some(LaunchEvent::RampCompleted);
                }
                None
            }
        }
    }

    /// Advances when the current flash has been held long enough. Elapsed time is
    /// measured from the last advance, not the last frame, so dropped or late frames
    /// never accumulate drift.
    fn tick_playback(&mut self, now_ms: u64) -> Option<(Advance, bool)> {
        let anchor = *self.last_advance_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(anchor) as f64;

        let session = &self.session;
        let delay = delay_for_chunk(
            session.tokens(),
            session.position(),
            session.chunk_size().get(),
            session.base_interval_ms(),
        );
        if elapsed < delay {
            return None;
        }

        let advance = self.session.advance();
        self.last_advance_ms = Some(now_ms);
        let mut saved = false;
        if advance == Advance::EndOfContent {
            debug!(position = self.session.position(), "end of content");
            saved = self.halt();
        }
        Some((advance, saved))
    }

    fn tick_autosave(&mut self, now_ms: u64) -> bool {
        if self.sink.is_none() || self.session.is_empty() {
            return false;
        }
        let last = *self.last_save_ms.get_or_insert(now_ms);
        if now_ms.saturating_sub(last) < self.autosave_interval_ms {
            return false;
        }
        self.last_save_ms = Some(now_ms);
        self.save_progress()
    }
}
