//! Line-Break Optimizer: chooses the line count, word split and font size for a sign.
//!
//! # Algorithm
//! For each candidate line count `k` in `1..=max_lines`:
//! 1. Stop if there are fewer words than `k`.
//! 2. Score every composition of the words into `k` lines by its line lengths sorted
//!    descending; the lexicographically smallest vector wins, first-encountered on ties.
//! 3. Font size = `max_font_size * reference_line_length / longest_line`.
//! 4. Accept when `floor(line_count_divisor * max / font_size) <= k` or `k == max_lines`;
//!    otherwise the text might render larger across more lines, so try `k + 1`.
//!
//! The accepted font size is clamped to `min(size, max, max * divisor / k)`.
//!
//! Line length is measured in characters (Unicode scalar values). Words are split on
//! single spaces only and never normalized, so joining the lines with single spaces
//! gives back the input exactly.

use serde::{Deserialize, Serialize};

use crate::layout::compositions::{Composition, Compositions};
use crate::layout::config::{default_layout_config, LayoutConfig};

/// The optimizer's output: the chosen lines and the font size they render at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedText {
    pub font_size: f64,
    pub lines: Vec<String>,
}

impl WrappedText {
    /// Rebuilds the original text from the wrapped lines.
    pub fn joined(&self) -> String {
        self.lines.join(" ")
    }
}

/// Best split found for one candidate line count.
struct Candidate {
    line_count: usize,
    lines: Vec<String>,
    longest: usize,
}

/// Wraps `text` with the default layout constants.
pub fn wrap_text(text: &str, max_font_size: f64) -> WrappedText {
    wrap_text_with(text, max_font_size, &default_layout_config())
}

/// Wraps `text` for a text area whose maximum font size is `max_font_size`.
///
/// Total over any input: empty text yields one empty line at `max_font_size`, and a
/// single over-long word yields one line at a reduced (possibly overflowing) size.
pub fn wrap_text_with(text: &str, max_font_size: f64, config: &LayoutConfig) -> WrappedText {
    let words: Vec<&str> = text.split(' ').collect();
    let mut accepted: Option<(Candidate, f64)> = None;

    for line_count in 1..=config.max_lines {
        if words.len() < line_count {
            break;
        }

        let Some(candidate) = best_split(&words, line_count) else {
            continue;
        };

        let font_size = scaled_font_size(candidate.longest, max_font_size, config);
        let lines_that_fit = (config.line_count_divisor * max_font_size / font_size).floor();
        let done = lines_that_fit <= line_count as f64 || line_count == config.max_lines;
        accepted = Some((candidate, font_size));
        if done {
            break;
        }
    }

    match accepted {
        Some((candidate, font_size)) => {
            let ceiling = max_font_size * config.line_count_divisor / candidate.line_count as f64;
            WrappedText {
                font_size: font_size.min(max_font_size).min(ceiling),
                lines: candidate.lines,
            }
        }
        // `split` always yields at least one word, so a 1-line split always exists.
        None => WrappedText {
            font_size: max_font_size,
            lines: vec![text.to_string()],
        },
    }
}

/// Font size at which the longest line spans the text area. An empty longest line
/// needs no scaling.
fn scaled_font_size(longest: usize, max_font_size: f64, config: &LayoutConfig) -> f64 {
    if longest == 0 {
        max_font_size
    } else {
        max_font_size * config.reference_line_length / longest as f64
    }
}

/// Finds the composition of `words` into `line_count` lines whose descending line
/// lengths are lexicographically smallest. Earlier compositions keep ties.
fn best_split(words: &[&str], line_count: usize) -> Option<Candidate> {
    let mut best: Option<(Composition, Vec<usize>)> = None;

    for comp in Compositions::new(words.len(), line_count) {
        let mut sorted = line_lengths(words, &comp);
        sorted.sort_unstable_by(|a, b| b.cmp(a));

        let better = match &best {
            None => true,
            Some((_, best_sorted)) => sorted < *best_sorted,
        };
        if better {
            best = Some((comp, sorted));
        }
    }

    best.map(|(comp, sorted)| Candidate {
        line_count,
        lines: build_lines(words, &comp),
        longest: sorted[0],
    })
}

/// Character length of each line, where a line is its words joined by single spaces.
fn line_lengths(words: &[&str], comp: &[usize]) -> Vec<usize> {
    let mut start = 0;
    comp.iter()
        .map(|&count| {
            let slice = &words[start..start + count];
            start += count;
            slice.iter().map(|w| w.chars().count()).sum::<usize>() + (count - 1)
        })
        .collect()
}

fn build_lines(words: &[&str], comp: &[usize]) -> Vec<String> {
    let mut start = 0;
    comp.iter()
        .map(|&count| {
            let line = words[start..start + count].join(" ");
            start += count;
            line
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
