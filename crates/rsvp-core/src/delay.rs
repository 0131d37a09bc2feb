//! How long each flash stays on screen.
//!
//! Every rule yields a multiplier on the base interval; the largest applicable one
//! wins. Multipliers never stack.

use unicode_segmentation::UnicodeSegmentation;

use crate::text::ends_sentence;

const QUOTED_SENTENCE_END: f64 = 1.8;
const SENTENCE_END: f64 = 1.5;
const CLAUSE_END: f64 = 1.2;
const SENTENCE_LEAD_IN: f64 = 1.15;
const CONTAINS_DIGIT: f64 = 1.15;
const ACRONYM: f64 = 1.15;
const HYPHENATED: f64 = 1.1;
const LONG_WORD: f64 = 1.1;

const CLOSERS: [char; 6] = ['"', '\'', '\u{201D}', '\u{2019}', ')', ']'];

/// Base interval for one flash: `60000 / wpm`, scaled by the number of tokens shown.
pub fn base_interval_ms(wpm: u16, chunk_len: usize) -> f64 {
    60_000.0 / f64::from(wpm.max(1)) * chunk_len.max(1) as f64
}

pub fn delay_multiplier(token: &str, preceding: Option<&str>) -> f64 {
    if token.is_empty() {
        return 1.0;
    }

    let mut multiplier: f64 = 1.0;

    let without_closers = token.trim_end_matches(CLOSERS);
    if without_closers.len() < token.len() && without_closers.ends_with(['.', '!', '?']) {
        multiplier = multiplier.max(QUOTED_SENTENCE_END);
    } else if token.ends_with(['.', '!', '?']) {
        multiplier = multiplier.max(SENTENCE_END);
    }
    if token.ends_with([',', ';', ':']) {
        multiplier = multiplier.max(CLAUSE_END);
    }
    if preceding.is_some_and(ends_sentence) {
        multiplier = multiplier.max(SENTENCE_LEAD_IN);
    }
    if token.chars().any(|c| c.is_ascii_digit()) {
        multiplier = multiplier.max(CONTAINS_DIGIT);
    }
    if is_acronym(token) {
        multiplier = multiplier.max(ACRONYM);
    }

    let len = token.graphemes(true).count();
    if token.contains('-') && len > 3 {
        multiplier = multiplier.max(HYPHENATED);
    }
    if len > 10 {
        multiplier = multiplier.max(LONG_WORD);
    }

    multiplier
}

fn is_acronym(token: &str) -> bool {
    let letters: Vec<char> = token.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase())
}

pub fn delay_for_token(token: &str, preceding: Option<&str>, base_interval_ms: f64) -> f64 {
    base_interval_ms * delay_multiplier(token, preceding)
}

/// Delay for the chunk starting at `start`; the last token in the chunk decides.
///
/// `base_interval_ms` must already be scaled by the chunk size.
pub fn delay_for_chunk(
    tokens: &[String],
    start: usize,
    chunk_len: usize,
    base_interval_ms: f64,
) -> f64 {
    if tokens.is_empty() || start >= tokens.len() {
        return base_interval_ms;
    }
    let last = (start + chunk_len.max(1) - 1).min(tokens.len() - 1);
    let preceding = last.checked_sub(1).map(|i| tokens[i].as_str());
    delay_for_token(&tokens[last], preceding, base_interval_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn quoted_sentence_end_literal() {
        assert_eq!(delay_for_token("Wait!\"", None, 200.0), 360.0);
    }

    #[test]
    fn punctuation_ordering() {
        let end = delay_for_token("end.", None, 200.0);
        let comma = delay_for_token("end,", None, 200.0);
        let plain = delay_for_token("end", None, 200.0);
        assert!(end >= comma && comma >= plain);
        assert_eq!(end, 300.0);
        assert_eq!(comma, 240.0);
        assert_eq!(plain, 200.0);
    }

    #[test]
    fn empty_token_keeps_base() {
        assert_eq!(delay_for_token("", Some("end."), 180.0), 180.0);
    }

    #[test]
    fn rules_take_maximum_not_product() {
        // long, hyphenated and after a sentence end: max(1.1, 1.1, 1.15)
        let m = delay_multiplier("state-of-the-art", Some("Done."));
        assert_eq!(m, SENTENCE_LEAD_IN);
        // sentence end plus digits: 1.5 wins
        assert_eq!(delay_multiplier("2024.", None), SENTENCE_END);
    }

    #[test]
    fn secondary_rules() {
        assert_eq!(delay_multiplier("NASA", None), ACRONYM);
        assert_eq!(delay_multiplier("Go", Some("stop?\"")), SENTENCE_LEAD_IN);
        assert_eq!(delay_multiplier("x-ray", None), HYPHENATED);
        assert_eq!(delay_multiplier("a-b", None), 1.0);
        assert_eq!(delay_multiplier("comprehension", None), LONG_WORD);
        assert_eq!(delay_multiplier("US", None), 1.0);
        assert_eq!(delay_multiplier("(aside)", None), 1.0);
    }

    #[test]
    fn bracketed_sentence_end() {
        assert_eq!(delay_multiplier("(really.)", None), QUOTED_SENTENCE_END);
    }

    #[test]
    fn base_interval_scales_with_chunk() {
        assert_eq!(base_interval_ms(300, 1), 200.0);
        assert_eq!(base_interval_ms(300, 3), 600.0);
    }

    #[test]
    fn chunk_delay_uses_last_token() {
        let tokens = words(&["one", "two.", "three"]);
        let base = base_interval_ms(300, 2);
        assert_eq!(delay_for_chunk(&tokens, 0, 2, base), base * SENTENCE_END);
        // truncated final chunk still resolves its last real token
        assert_eq!(delay_for_chunk(&tokens, 2, 2, base), base * SENTENCE_LEAD_IN);
        assert_eq!(delay_for_chunk(&[], 0, 1, base), base);
    }
}
