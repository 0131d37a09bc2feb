use std::time::Duration;

use tracing::debug;

use crate::{
    delay::base_interval_ms,
    launch::LaunchState,
    text::{content_id, tokenize},
    types::{
        clamp_wpm, ChunkSize, ContentMeta, Heading, PlaybackState, ProgressReport, SourceKind,
        DEFAULT_WPM,
    },
};

/// The mutable reading session: tokens, position, speed and launch state.
///
/// Only [`crate::reader::Reader`] mutates it; everyone else reads through the
/// accessors or a [`SessionSnapshot`].
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) tokens: Vec<String>,
    pub(crate) content_id: Option<String>,
    pub(crate) title: String,
    pub(crate) meta: Option<ContentMeta>,
    pub(crate) position: usize,
    pub(crate) progress: f64,
    pub(crate) playback: PlaybackState,
    pub(crate) wpm: u16,
    pub(crate) chunk_size: ChunkSize,
    pub(crate) launch: LaunchState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub position: usize,
    pub word_count: usize,
    pub progress: f64,
    pub playing: bool,
    pub wpm: u16,
    pub effective_wpm: u16,
    pub chunk_size: ChunkSize,
    pub launch: LaunchState,
    pub chunk: Vec<String>,
    pub title: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_WPM, ChunkSize::One)
    }
}

impl Session {
    pub fn new(wpm: u16, chunk_size: ChunkSize) -> Self {
        Self {
            tokens: Vec::new(),
            content_id: None,
            title: String::new(),
            meta: None,
            position: 0,
            progress: 0.0,
            playback: PlaybackState::Stopped,
            wpm: clamp_wpm(wpm as i32),
            chunk_size,
            launch: LaunchState::inert(),
        }
    }

    /// Replaces the content and resets position, progress, playback and launch in
    /// one step.
    pub(crate) fn load_content(&mut self, raw: &str, meta: Option<ContentMeta>) {
        let tokens = tokenize(raw);
        let count = tokens.len();
        let title = match &meta {
            Some(m) => m
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("Untitled ({count} words)")),
            None => format!("Pasted text ({count} words)"),
        };
        let meta = meta.map(|mut m| {
            m.headings.retain(|h| h.token_index < count);
            m
        });
        let id = content_id(&tokens);
        debug!(tokens = count, content_id = %id, "content loaded");

        *self = Self {
            tokens,
            content_id: Some(id),
            title,
            meta,
            position: 0,
            progress: 0.0,
            playback: PlaybackState::Stopped,
            wpm: self.wpm,
            chunk_size: self.chunk_size,
            launch: LaunchState::inert(),
        };
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new(self.wpm, self.chunk_size);
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn wpm(&self) -> u16 {
        self.wpm
    }

    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    pub fn launch(&self) -> &LaunchState {
        &self.launch
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn meta(&self) -> Option<&ContentMeta> {
        self.meta.as_ref()
    }

    pub fn headings(&self) -> &[Heading] {
        self.meta.as_ref().map(|m| m.headings.as_slice()).unwrap_or(&[])
    }

    /// The last heading at or before the current position.
    pub fn current_heading(&self) -> Option<&Heading> {
        self.headings()
            .iter()
            .filter(|h| h.token_index <= self.position)
            .max_by_key(|h| h.token_index)
    }

    /// WPM driving the scheduler right now: the ramp's value while ramping.
    pub fn effective_wpm(&self) -> u16 {
        self.launch.ramp_wpm_override().unwrap_or(self.wpm)
    }

    pub fn base_interval_ms(&self) -> f64 {
        base_interval_ms(self.effective_wpm(), self.chunk_size.get())
    }

    /// Tokens of the flash currently on screen.
    pub fn current_chunk(&self) -> &[String] {
        if self.tokens.is_empty() {
            return &[];
        }
        let start = self.position.min(self.tokens.len());
        let end = (start + self.chunk_size.get()).min(self.tokens.len());
        &self.tokens[start..end]
    }

    pub fn last_index(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    pub(crate) fn set_position(&mut self, index: usize) {
        self.position = index;
        self.progress = progress_for(index, self.tokens.len());
    }

    pub fn time_remaining(&self) -> Duration {
        let remaining = self.tokens.len().saturating_sub(self.position + 1);
        let minutes = remaining as f64 / f64::from(self.wpm.max(1));
        Duration::from_secs_f64(minutes * 60.0)
    }

    pub fn progress_report(&self) -> Option<ProgressReport> {
        let content_id = self.content_id.clone()?;
        if self.tokens.is_empty() {
            return None;
        }
        let meta = self.meta.as_ref();
        Some(ProgressReport {
            content_id,
            title: self.title.clone(),
            source_kind: meta.map(|m| m.source_kind).unwrap_or(SourceKind::Text),
            current_index: self.position,
            source_url: meta.and_then(|m| m.source_url.clone()),
            word_count: self.tokens.len(),
            content: self.tokens.join(" "),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            position: self.position,
            word_count: self.tokens.len(),
            progress: self.progress,
            playing: self.is_playing(),
            wpm: self.wpm,
            effective_wpm: self.effective_wpm(),
            chunk_size: self.chunk_size,
            launch: self.launch,
            chunk: self.current_chunk().to_vec(),
            title: self.title.clone(),
        }
    }
}

/// Percentage through the sequence; 0 for sequences of one token or fewer.
pub fn progress_for(index: usize, len: usize) -> f64 {
    if len > 1 {
        index as f64 / (len - 1) as f64 * 100.0
    } else {
        0.0
    }
}

/// Renders a remaining-time estimate as `45s`, `3m 20s` or `1h 5m`.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs_f64().ceil() as u64;
    if secs < 60 {
        return format!("{secs}s");
    }
    if secs < 3_600 {
        let (mins, secs) = (secs / 60, secs % 60);
        if secs == 0 {
            return format!("{mins}m");
        }
        return format!("{mins}m {secs}s");
    }
    let mins = (secs + 30) / 60;
    format!("{}h {}m", mins / 60, mins % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(text: &str) -> Session {
        let mut session = Session::default();
        session.load_content(text, None);
        session
    }

    #[test]
    fn load_resets_everything() {
        let mut session = loaded("one two three four");
        session.set_position(2);
        session.playback = PlaybackState::Playing;
        session.launch = LaunchState::begin(600);

        session.load_content("fresh text", Some(ContentMeta::default()));
        assert_eq!(session.position(), 0);
        assert_eq!(session.progress(), 0.0);
        assert!(!session.is_playing());
        assert_eq!(session.launch(), &LaunchState::inert());
        assert_eq!(session.tokens(), ["fresh", "text"]);
        assert_eq!(session.title(), "Untitled (2 words)");
    }

    #[test]
    fn pasted_text_title() {
        assert_eq!(loaded("a b c").title(), "Pasted text (3 words)");
    }

    #[test]
    fn load_keeps_speed_settings() {
        let mut session = Session::new(450, ChunkSize::Two);
        session.load_content("x y", None);
        assert_eq!(session.wpm(), 450);
        assert_eq!(session.chunk_size(), ChunkSize::Two);
    }

    #[test]
    fn drops_out_of_range_headings() {
        let mut session = Session::default();
        let meta = ContentMeta {
            title: Some("Doc".into()),
            headings: vec![
                Heading {
                    token_index: 0,
                    title: "Intro".into(),
                    level: 2,
                },
                Heading {
                    token_index: 2,
                    title: "Body".into(),
                    level: 2,
                },
                Heading {
                    token_index: 40,
                    title: "Gone".into(),
                    level: 2,
                },
            ],
            ..ContentMeta::default()
        };
        session.load_content("a b c d", Some(meta));
        assert_eq!(session.headings().len(), 2);
        session.set_position(3);
        assert_eq!(session.current_heading().map(|h| h.title.as_str()), Some("Body"));
    }

    #[test]
    fn progress_boundaries() {
        assert_eq!(progress_for(0, 1), 0.0);
        assert_eq!(progress_for(0, 0), 0.0);
        assert_eq!(progress_for(9, 10), 100.0);
        assert_eq!(progress_for(5, 11), 50.0);
    }

    #[test]
    fn current_chunk_truncates_at_end() {
        let mut session = loaded("a b c d e");
        session.chunk_size = ChunkSize::Three;
        session.set_position(3);
        assert_eq!(session.current_chunk(), ["d", "e"]);
        assert!(Session::default().current_chunk().is_empty());
    }

    #[test]
    fn remaining_time_formatting() {
        assert_eq!(format_remaining(Duration::from_secs(45)), "45s");
        assert_eq!(format_remaining(Duration::from_secs(180)), "3m");
        assert_eq!(format_remaining(Duration::from_secs(200)), "3m 20s");
        assert_eq!(format_remaining(Duration::from_secs(3900)), "1h 5m");
    }

    #[test]
    fn remaining_time_carries_into_the_next_unit() {
        assert_eq!(format_remaining(Duration::from_secs_f64(59.4)), "1m");
        assert_eq!(format_remaining(Duration::from_secs_f64(3_599.7)), "1h 0m");
        assert_eq!(format_remaining(Duration::from_secs(7_199)), "2h 0m");
        assert_eq!(format_remaining(Duration::from_secs(7_170)), "2h 0m");
        assert_eq!(format_remaining(Duration::from_secs(7_169)), "1h 59m");
    }

    #[test]
    fn remaining_time_uses_wpm() {
        let mut session = Session::new(300, ChunkSize::One);
        session.load_content(&vec!["w"; 301].join(" "), None);
        assert_eq!(session.time_remaining(), Duration::from_secs(60));
    }

    #[test]
    fn empty_session_reports_nothing() {
        assert!(Session::default().progress_report().is_none());
        assert!(loaded("   ").progress_report().is_none());
    }
}
