use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::types::{clamp_wpm, ChunkSize, DEFAULT_WPM};

pub const QUALIFIER: &str = "com";
pub const ORGANIZATION: &str = "speedreader";
pub const APPLICATION: &str = "speedreader";

const SETTINGS_FILE: &str = "settings.toml";
const DEFAULT_AUTOSAVE_SECS: u64 = 10;
const MAX_AUTOSAVE_SECS: u64 = 3_600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Settings encode error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("No config directory available")]
    NoConfigDir,
}

pub fn config_root() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).map(|p| p.config_dir().to_path_buf())
}

pub fn settings_path() -> Option<PathBuf> {
    config_root().map(|dir| dir.join(SETTINGS_FILE))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSettings")]
pub struct ReaderSettings {
    pub wpm: u16,
    pub chunk_size: ChunkSize,
    pub autosave_interval_secs: u64,
}

/// Settings as written on disk, before range checks.
#[derive(Deserialize)]
struct RawSettings {
    wpm: Option<i64>,
    chunk_size: Option<i64>,
    autosave_interval_secs: Option<i64>,
}

impl From<RawSettings> for ReaderSettings {
    fn from(raw: RawSettings) -> Self {
        let wpm = raw.wpm.map_or(DEFAULT_WPM, |w| {
            clamp_wpm(w.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
        });
        let chunk_size = raw
            .chunk_size
            .and_then(|n| usize::try_from(n).ok())
            .and_then(ChunkSize::new)
            .unwrap_or_default();
        let autosave_interval_secs = raw
            .autosave_interval_secs
            .and_then(|s| u64::try_from(s).ok())
            .filter(|&s| s > 0)
            .map_or(DEFAULT_AUTOSAVE_SECS, |s| s.min(MAX_AUTOSAVE_SECS));
        Self {
            wpm,
            chunk_size,
            autosave_interval_secs,
        }
    }
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            chunk_size: ChunkSize::One,
            autosave_interval_secs: DEFAULT_AUTOSAVE_SECS,
        }
    }
}

impl ReaderSettings {
    /// Parses settings; out-of-range values are clamped or defaulted field by field.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads settings from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Loads from the user config directory, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "ignoring unreadable settings");
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = settings_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }
}
