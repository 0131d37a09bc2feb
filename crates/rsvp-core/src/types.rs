use serde::{Deserialize, Serialize};

pub const MIN_WPM: u16 = 150;
pub const MAX_WPM: u16 = 1200;
pub const DEFAULT_WPM: u16 = 300;
pub const WPM_STEP: i16 = 25;

/// Number of tokens shown together in one flash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChunkSize {
    #[default]
    One,
    Two,
    Three,
}

impl ChunkSize {
    pub fn new(n: usize) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    pub fn get(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Rounds `index` down to the start of the chunk containing it.
    pub fn snap(self, index: usize) -> usize {
        let n = self.get();
        (index / n) * n
    }
}

impl TryFrom<u8> for ChunkSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value as usize)
            .ok_or_else(|| format!("chunk size must be 1, 2 or 3, got {value}"))
    }
}

impl From<ChunkSize> for u8 {
    fn from(value: ChunkSize) -> Self {
        value.get() as u8
    }
}

pub fn clamp_wpm(wpm: i32) -> u16 {
    wpm.clamp(MIN_WPM as i32, MAX_WPM as i32) as u16
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Text,
    Pdf,
    Epub,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub token_index: usize,
    pub title: String,
    pub level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMeta {
    pub title: Option<String>,
    #[serde(default)]
    pub source_kind: SourceKind,
    pub source_url: Option<String>,
    #[serde(default)]
    pub headings: Vec<Heading>,
}

impl ContentMeta {
    pub fn titled(title: impl Into<String>, source_kind: SourceKind) -> Self {
        Self {
            title: Some(title.into()),
            source_kind,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

/// What the persistence collaborator receives on autosave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub content_id: String,
    pub title: String,
    pub source_kind: SourceKind,
    pub current_index: usize,
    pub source_url: Option<String>,
    pub word_count: usize,
    /// Token sequence joined by single spaces; enough to reload the same content.
    pub content: String,
}

pub trait ProgressSink {
    fn save_progress(&mut self, report: &ProgressReport);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_size_rejects_out_of_range() {
        assert_eq!(ChunkSize::new(0), None);
        assert_eq!(ChunkSize::new(4), None);
        assert_eq!(ChunkSize::new(2), Some(ChunkSize::Two));
    }

    #[test]
    fn snap_rounds_down_to_chunk_start() {
        assert_eq!(ChunkSize::Three.snap(7), 6);
        assert_eq!(ChunkSize::Two.snap(7), 6);
        assert_eq!(ChunkSize::One.snap(7), 7);
        assert_eq!(ChunkSize::Three.snap(0), 0);
    }

    #[test]
    fn wpm_is_clamped() {
        assert_eq!(clamp_wpm(10), MIN_WPM);
        assert_eq!(clamp_wpm(5000), MAX_WPM);
        assert_eq!(clamp_wpm(425), 425);
    }
}
