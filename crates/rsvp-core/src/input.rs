//! Maps keyboard, touch and button input onto reader operations.

use crate::{reader::Reader, types::WPM_STEP};

const SWIPE_THRESHOLD_PX: f32 = 50.0;
const SWIPE_TIMEOUT_MS: u64 = 300;
const TAP_THRESHOLD_PX: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    Pause,
    AdjustWpm(i16),
    Back(usize),
    Forward(usize),
    BackSentence,
    ForwardSentence,
    JumpTo(usize),
    Restart,
    SetChunkSize(usize),
    Launch,
    LaunchFromStart,
    CancelLaunch,
}

impl Command {
    pub const SPEED_UP: Command = Command::AdjustWpm(WPM_STEP);
    pub const SLOW_DOWN: Command = Command::AdjustWpm(-WPM_STEP);
}

/// A finished touch, classified from its displacement and duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    SwipeLeft,
    SwipeRight,
}

impl Gesture {
    pub fn classify(dx: f32, dy: f32, elapsed_ms: u64) -> Option<Self> {
        if elapsed_ms >= SWIPE_TIMEOUT_MS {
            return None;
        }
        let (abs_x, abs_y) = (dx.abs(), dy.abs());
        if abs_x < TAP_THRESHOLD_PX && abs_y < TAP_THRESHOLD_PX {
            return Some(Self::Tap);
        }
        if abs_x > SWIPE_THRESHOLD_PX && abs_x > abs_y {
            return Some(if dx > 0.0 {
                Self::SwipeRight
            } else {
                Self::SwipeLeft
            });
        }
        None
    }

    pub fn command(self) -> Command {
        match self {
            Self::Tap => Command::TogglePlay,
            Self::SwipeRight => Command::Back(crate::nav::DEFAULT_SKIP),
            Self::SwipeLeft => Command::Forward(crate::nav::DEFAULT_SKIP),
        }
    }
}

impl Reader {
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePlay => self.toggle_play(),
            Command::Pause => self.pause(),
            Command::AdjustWpm(delta) => self.adjust_wpm(delta),
            Command::Back(n) => self.go_back(n),
            Command::Forward(n) => self.go_forward(n),
            Command::BackSentence => self.go_back_sentence(),
            Command::ForwardSentence => self.go_forward_sentence(),
            Command::JumpTo(index) => self.jump_to(index),
            Command::Restart => self.restart(),
            Command::SetChunkSize(n) => {
                self.set_chunk_size(n);
            }
            Command::Launch => {
                self.start_launch();
            }
            Command::LaunchFromStart => {
                self.launch_from_start();
            }
            Command::CancelLaunch => self.cancel_launch(),
        }
    }
}
