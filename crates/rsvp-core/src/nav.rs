//! Position navigation. Every operation leaves the position on a chunk boundary
//! and recomputes progress; on an empty sequence all of them are no-ops.

use tracing::debug;

use crate::{session::Session, text::ends_sentence, types::ChunkSize};

pub const DEFAULT_SKIP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// The next chunk would start past the last token.
    EndOfContent,
}

impl Session {
    fn settle(&mut self, raw: usize) {
        if self.tokens.is_empty() {
            self.set_position(0);
            return;
        }
        let clamped = raw.min(self.last_index());
        self.set_position(self.chunk_size.snap(clamped));
    }

    pub(crate) fn advance(&mut self) -> Advance {
        if self.tokens.is_empty() {
            return Advance::EndOfContent;
        }
        let next = self.position + self.chunk_size.get();
        if next > self.last_index() {
            self.settle(self.last_index());
            return Advance::EndOfContent;
        }
        self.set_position(next);
        Advance::Moved
    }

    pub(crate) fn jump_to(&mut self, index: usize) {
        self.settle(index);
    }

    pub(crate) fn go_back(&mut self, n: usize) {
        self.settle(self.position.saturating_sub(n));
    }

    pub(crate) fn go_forward(&mut self, n: usize) {
        self.settle(self.position.saturating_add(n));
    }

    /// Start of the sentence before the current one, or of the current one when the
    /// position sits mid-sentence.
    pub(crate) fn go_back_sentence(&mut self) {
        if self.tokens.is_empty() {
            return;
        }
        let here = self.position.min(self.last_index());
        let mut target = self.sentence_start_before(here);
        if target == here && here > 0 {
            target = self.sentence_start_before(here - 1);
        }
        self.settle(target);
    }

    /// Token after the next sentence ending at or beyond the end of the current chunk.
    pub(crate) fn go_forward_sentence(&mut self) {
        if self.tokens.is_empty() {
            return;
        }
        let from = (self.position + self.chunk_size.get() - 1).min(self.last_index());
        let target = self.tokens[from..]
            .iter()
            .position(|t| ends_sentence(t))
            .map(|offset| from + offset + 1)
            .unwrap_or(self.last_index());
        self.settle(target);
    }

    /// Index of the first token of the sentence containing `index`.
    fn sentence_start_before(&self, index: usize) -> usize {
        self.tokens[..index]
            .iter()
            .rposition(|t| ends_sentence(t))
            .map(|end| end + 1)
            .unwrap_or(0)
    }

    pub(crate) fn set_chunk_size(&mut self, n: usize) -> bool {
        let Some(size) = ChunkSize::new(n) else {
            return false;
        };
        if size != self.chunk_size {
            debug!(from = self.chunk_size.get(), to = n, "chunk size changed");
        }
        self.chunk_size = size;
        let position = self.position;
        self.settle(position);
        true
    }
}
