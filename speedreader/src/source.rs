use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use rsvp_core::types::{ContentMeta, SourceKind};

/// Plain text handed to the reader, with whatever title the origin suggests.
pub struct TextSource {
    pub path: Option<PathBuf>,
    pub content: String,
}

impl TextSource {
    pub fn open(path: &Path) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            content,
        })
    }

    pub fn stdin() -> io::Result<Self> {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(Self {
            path: None,
            content,
        })
    }

    /// Files become titled text; piped input is left untitled so the reader names it.
    pub fn meta(&self) -> Option<ContentMeta> {
        let title = self.path.as_deref().and_then(title_from_path)?;
        Some(ContentMeta::titled(title, SourceKind::Text))
    }
}

fn title_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem().and_then(|s| s.to_str())?;
    let title = prettify_title(stem);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn prettify_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_space = false;
    for ch in raw.chars() {
        let mapped = match ch {
            '_' | '-' | '.' => ' ',
            _ => ch,
        };
        if mapped.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(mapped);
            last_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_come_from_file_stems() {
        assert_eq!(
            title_from_path(Path::new("/tmp/the_long-essay.v2.txt")).as_deref(),
            Some("the long essay v2")
        );
        assert_eq!(title_from_path(Path::new("/tmp/___.txt")), None);
    }

    #[test]
    fn piped_text_has_no_meta() {
        let source = TextSource {
            path: None,
            content: "hello".into(),
        };
        assert!(source.meta().is_none());
    }
}
