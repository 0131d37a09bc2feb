//! Optimal Recognition Point: the letter the eye should fixate on.
//!
//! Indices count grapheme clusters, so accented letters and emoji stay whole.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrpResult {
    pub before: String,
    pub focal: String,
    pub after: String,
    pub focal_index: usize,
}

impl OrpResult {
    fn split(graphemes: &[&str], index: usize) -> Self {
        let pivot = index.min(graphemes.len());
        Self {
            before: graphemes[..pivot].concat(),
            focal: graphemes.get(index).map(|g| g.to_string()).unwrap_or_default(),
            after: graphemes.get(index + 1..).map(|g| g.concat()).unwrap_or_default(),
            focal_index: index,
        }
    }
}

/// Focal index for a word of `len` graphemes.
pub fn orp_index(len: usize) -> usize {
    match len {
        0..=2 => 0,
        3..=6 => 1,
        7..=8 => 2,
        9..=10 => 3,
        _ => (len as f64 * 0.35).floor() as usize,
    }
}

pub fn calculate_orp(token: &str) -> OrpResult {
    let graphemes: Vec<&str> = token.graphemes(true).collect();
    OrpResult::split(&graphemes, orp_index(graphemes.len()))
}

/// Which token of an `n`-token chunk carries the focal letter.
fn focal_slot(n: usize) -> usize {
    if n == 2 {
        0
    } else {
        n / 2
    }
}

/// ORP over a multi-word flash. Indices refer to the tokens joined by single spaces.
pub fn calculate_chunk_orp<S: AsRef<str>>(tokens: &[S]) -> OrpResult {
    match tokens {
        [] => OrpResult::default(),
        [single] => calculate_orp(single.as_ref()),
        _ => {
            let slot = focal_slot(tokens.len());
            let mut graphemes: Vec<&str> = Vec::new();
            let mut focal_offset = 0;
            for (i, token) in tokens.iter().enumerate() {
                if i > 0 {
                    graphemes.push(" ");
                }
                if i == slot {
                    focal_offset = graphemes.len();
                }
                graphemes.extend(token.as_ref().graphemes(true));
            }
            let local = calculate_orp(tokens[slot].as_ref()).focal_index;
            OrpResult::split(&graphemes, focal_offset + local)
        }
    }
}
