use crate::nav::{Advance, DEFAULT_SKIP};

use super::Reader;

impl Reader {
    /// Moves one chunk forward. Reaching the end stops playback.
    pub fn advance(&mut self) -> Advance {
        let outcome = self.session.advance();
        if outcome == Advance::EndOfContent {
            self.halt();
        }
        outcome
    }

    pub fn jump_to(&mut self, index: usize) {
        self.session.jump_to(index);
    }

    /// Seeks to a fraction of the content, e.g. from a click on a progress bar.
    pub fn jump_to_fraction(&mut self, fraction: f64) {
        if self.session.is_empty() || !fraction.is_finite() {
            return;
        }
        let index = (fraction.clamp(0.0, 1.0) * self.session.word_count() as f64).floor();
        self.session.jump_to(index as usize);
    }

    pub fn go_back(&mut self, n: usize) {
        self.session.go_back(n);
    }

    pub fn go_forward(&mut self, n: usize) {
        self.session.go_forward(n);
    }

    pub fn skip_back(&mut self) {
        self.go_back(DEFAULT_SKIP);
    }

    pub fn skip_forward(&mut self) {
        self.go_forward(DEFAULT_SKIP);
    }

    pub fn go_back_sentence(&mut self) {
        self.session.go_back_sentence();
    }

    pub fn go_forward_sentence(&mut self) {
        self.session.go_forward_sentence();
    }
}
