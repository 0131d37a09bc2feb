use tracing::{info, warn};

use crate::{
    config::ReaderSettings,
    session::Session,
    types::{ContentMeta, ProgressSink},
};

pub struct Reader {
    pub(super) session: Session,
    pub(super) last_advance_ms: Option<u64>,
    pub(super) last_save_ms: Option<u64>,
    pub(super) autosave_interval_ms: u64,
    pub(super) sink: Option<Box<dyn ProgressSink>>,
}

impl Reader {
    pub fn new(settings: &ReaderSettings) -> Self {
        Self {
            session: Session::new(settings.wpm, settings.chunk_size),
            last_advance_ms: None,
            last_save_ms: None,
            autosave_interval_ms: settings.autosave_interval_secs.max(1).saturating_mul(1_000),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn load_content(&mut self, raw: &str, meta: Option<ContentMeta>) {
        self.session.load_content(raw, meta);
        self.last_advance_ms = None;
        self.last_save_ms = None;
    }

    /// Loads content and jumps straight to a saved position without reporting
    /// progress for the jump.
    pub fn resume(&mut self, raw: &str, meta: Option<ContentMeta>, index: usize) {
        self.load_content(raw, meta);
        self.session.jump_to(index);
        info!(
            index = self.session.position(),
            words = self.session.word_count(),
            "resumed reading"
        );
    }

    /// Drops the content entirely.
    pub fn reset(&mut self) {
        self.session.clear();
        self.last_advance_ms = None;
        self.last_save_ms = None;
    }

    pub(super) fn save_progress(&mut self) -> bool {
        let Some(sink) = self.sink.as_mut() else {
            return false;
        };
        match self.session.progress_report() {
            Some(report) => {
                sink.save_progress(&report);
                true
            }
            None => {
                warn!("progress requested without loaded content");
                false
            }
        }
    }
}
