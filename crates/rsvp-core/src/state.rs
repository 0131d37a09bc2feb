//! Reading history: resumable progress per content, kept as a small JSON file.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    config,
    types::{ProgressReport, ProgressSink, SourceKind},
};

pub const MAX_HISTORY_ITEMS: usize = 20;
pub const MAX_STORED_CONTENT_CHARS: usize = 500_000;
const PREVIEW_CHARS: usize = 100;
const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("History parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No config directory available")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingItem {
    pub id: String,
    pub title: String,
    pub source_kind: SourceKind,
    pub source_url: Option<String>,
    pub word_count: usize,
    pub current_index: usize,
    pub last_read: String,
    pub preview: String,
    /// Absent when the content was too large to keep.
    pub content: Option<String>,
}

impl ReadingItem {
    fn from_report(report: &ProgressReport) -> Self {
        let content = (report.content.chars().count() <= MAX_STORED_CONTENT_CHARS)
            .then(|| report.content.clone());
        Self {
            id: report.content_id.clone(),
            title: report.title.clone(),
            source_kind: report.source_kind,
            source_url: report.source_url.clone(),
            word_count: report.word_count,
            current_index: report.current_index,
            last_read: Utc::now().to_rfc3339(),
            preview: preview(&report.content),
            content,
        }
    }

    pub fn can_resume(&self) -> bool {
        self.content.is_some() || self.source_url.is_some()
    }
}

fn preview(content: &str) -> String {
    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    let head = head.split_whitespace().collect::<Vec<_>>().join(" ");
    if content.chars().count() > PREVIEW_CHARS {
        format!("{head}...")
    } else {
        head
    }
}

pub struct HistoryStore {
    path: PathBuf,
    items: Vec<ReadingItem>,
}

impl HistoryStore {
    pub fn default_path() -> Option<PathBuf> {
        config::config_root().map(|dir| dir.join(HISTORY_FILE))
    }

    pub fn open_default() -> Result<Self, StateError> {
        let path = Self::default_path().ok_or(StateError::NoConfigDir)?;
        Self::open(&path)
    }

    /// Opens the store at `path`. A missing file is an empty history.
    pub fn open(path: &Path) -> Result<Self, StateError> {
        let items = match fs::read(path) {
            Ok(data) => serde_json::from_slice(&data)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            items,
        })
    }

    pub fn items(&self) -> &[ReadingItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&ReadingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_by_url(&self, url: &str) -> Option<&ReadingItem> {
        self.items
            .iter()
            .find(|item| item.source_url.as_deref() == Some(url))
    }

    /// Moves the report's content to the front of the history, replacing any older
    /// entry for the same content.
    pub fn record(&mut self, report: &ProgressReport) -> Result<(), StateError> {
        self.items.retain(|item| item.id != report.content_id);
        self.items.insert(0, ReadingItem::from_report(report));
        self.items.truncate(MAX_HISTORY_ITEMS);
        debug!(id = %report.content_id, index = report.current_index, "progress recorded");
        self.persist()
    }

    pub fn remove(&mut self, id: &str) -> Result<(), StateError> {
        self.items.retain(|item| item.id != id);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<(), StateError> {
        self.items.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.items)?;
        let mut f = fs::File::create(&self.path)?;
        f.write_all(data.as_bytes())?;
        Ok(())
    }
}

impl ProgressSink for HistoryStore {
    fn save_progress(&mut self, report: &ProgressReport) {
        if let Err(err) = self.record(report) {
            warn!(path = %self.path.display(), %err, "failed to save reading progress");
        }
    }
}
