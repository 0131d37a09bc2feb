use tracing::debug;

use crate::{
    launch::LaunchState,
    types::{clamp_wpm, PlaybackState},
};

use super::Reader;

impl Reader {
    /// Starts playback; does nothing without content.
    pub fn play(&mut self) -> bool {
        if self.session.is_empty() {
            return false;
        }
        self.session.playback = PlaybackState::Playing;
        self.last_advance_ms = None;
        true
    }

    /// Stops playback and abandons any launch in progress.
    pub fn pause(&mut self) {
        self.halt();
    }

    pub fn toggle_play(&mut self) {
        if self.session.is_empty() {
            return;
        }
        if self.session.launch.is_launching {
            self.cancel_launch();
        } else if self.session.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn restart(&mut self) {
        self.session.playback = PlaybackState::Stopped;
        self.session.launch = LaunchState::inert();
        self.session.set_position(0);
        self.last_advance_ms = None;
    }

    pub fn set_wpm(&mut self, wpm: i32) {
        self.session.wpm = clamp_wpm(wpm);
    }

    pub fn adjust_wpm(&mut self, delta: i16) {
        self.set_wpm(i32::from(self.session.wpm) + i32::from(delta));
    }

    /// Accepts 1, 2 or 3; anything else leaves the session untouched.
    pub fn set_chunk_size(&mut self, n: usize) -> bool {
        self.session.set_chunk_size(n)
    }

    /// Begins the countdown towards a ramped start at the current WPM.
    pub fn start_launch(&mut self) -> bool {
        if self.session.is_empty() {
            return false;
        }
        self.session.playback = PlaybackState::Stopped;
        self.session.launch = LaunchState::begin(self.session.wpm);
        self.last_advance_ms = None;
        debug!(target_wpm = self.session.wpm, "launch started");
        true
    }

    pub fn launch_from_start(&mut self) -> bool {
        self.restart();
        self.start_launch()
    }

    pub fn cancel_launch(&mut self) {
        if self.session.launch.is_launching {
            debug!(phase = ?self.session.launch.phase(), "launch cancelled");
            self.halt();
        }
    }

    /// Common stop path: playback off, launch inert, progress reported.
    pub(super) fn halt(&mut self) -> bool {
        let was_playing = self.session.is_playing();
        self.session.playback = PlaybackState::Stopped;
        self.session.launch = LaunchState::inert();
        self.last_advance_ms = None;
        if was_playing && self.session.position > 0 {
            return self.save_progress();
        }
        false
    }
}
