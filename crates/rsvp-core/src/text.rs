//! Turns extracted text into the word sequence the reader flashes.
//!
//! Upstream extractors (HTML scrapers, PDF and EPUB text dumps) leave odd
//! whitespace, invisible characters and glued sentences behind. Cleanup here is
//! heuristic but never fails: any input string yields a (possibly empty) list of
//! non-empty tokens without internal whitespace.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use unicode_segmentation::UnicodeSegmentation;

const LONG_TOKEN_GRAPHEMES: usize = 25;
const CONTENT_ID_SAMPLE_CHARS: usize = 10_000;

static RE_ZERO_WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{200B}\u{200C}\u{200D}\u{FEFF}]").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s\u{00A0}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}]+").unwrap()
});
// `end."Next` / `end.)Next`
static RE_PUNCT_CLOSER_CAPITAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([.!?])(["'\u{201D}\u{2019})\]]+)(\p{Lu})"#).unwrap()
});
// `end.Next`
static RE_PUNCT_CAPITAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?])(\p{Lu})").unwrap());
// `said"He`; the quote must follow a non-space so opening quotes are left alone.
static RE_QUOTE_CAPITAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\S)(["\u{201D}])(\p{Lu})"#).unwrap());

pub fn tokenize(raw: &str) -> Vec<String> {
    let text = RE_ZERO_WIDTH.replace_all(raw, "");
    let text = RE_WHITESPACE.replace_all(&text, " ");
    let text = RE_PUNCT_CLOSER_CAPITAL.replace_all(&text, "${1}${2} ${3}");
    let text = RE_PUNCT_CAPITAL.replace_all(&text, "${1} ${2}");
    let text = RE_QUOTE_CAPITAL.replace_all(&text, "${1}${2} ${3}");

    text.trim()
        .split(' ')
        .filter(|word| !word.is_empty())
        .flat_map(split_long_token)
        .collect()
}

/// Breaks runaway tokens after each em-dash or double hyphen.
fn split_long_token(word: &str) -> Vec<String> {
    if word.graphemes(true).count() <= LONG_TOKEN_GRAPHEMES {
        return vec![word.to_string()];
    }

    let mut parts = Vec::new();
    let mut start = 0;
    let mut rest = word;
    let mut offset = 0;
    while !rest.is_empty() {
        let step = if rest.starts_with('—') {
            Some('—'.len_utf8())
        } else if rest.starts_with("--") {
            Some(2)
        } else {
            None
        };
        match step {
            Some(len) => {
                offset += len;
                parts.push(&word[start..offset]);
                start = offset;
            }
            None => {
                let ch_len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                offset += ch_len;
            }
        }
        rest = &word[offset..];
    }
    if start < word.len() {
        parts.push(&word[start..]);
    }

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Stable identifier for a token sequence, used to key saved progress.
pub fn content_id(tokens: &[String]) -> String {
    let joined = tokens.join(" ");
    let sample: String = joined.chars().take(CONTENT_ID_SAMPLE_CHARS).collect();
    let mut hasher = Sha256::new();
    hasher.update(sample.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// `true` for `end.`, `end!"`, `why?'` and similar.
pub fn ends_sentence(token: &str) -> bool {
    let trimmed = token
        .strip_suffix(['"', '\'', '\u{201D}', '\u{2019}'])
        .unwrap_or(token);
    trimmed.ends_with(['.', '!', '?'])
}
