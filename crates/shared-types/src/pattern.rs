//! Diamond pattern generation.
//!
//! A pattern for `n` is a diamond of text lines cut from the alphabet
//! [`ALPHABET`] tiled end to end. Line `i` (1-based) is a window of the tiled
//! alphabet starting at offset `i - 1`, and the window widths grow by two up
//! to a single peak row and then shrink by two, so the lines stack into a
//! rhombus when centered.
//!
//! Odd `n` produces `n` lines. Even `n` produces `n + 1` lines so the diamond
//! still has one peak row.

use std::num::IntErrorKind;

use thiserror::Error;

use crate::PatternResult;

/// Characters the diamond is cut from.
pub const ALPHABET: &str = "FORMULAQSOLUTIONS";

/// Smallest accepted size; lower inputs clamp to it.
pub const MIN_N: i64 = 1;

/// Largest accepted size; higher inputs clamp to it.
pub const MAX_N: i64 = 100;

/// Message shown when the input is not an integer.
pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid integer between 1 and 100.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Please enter a valid integer between 1 and 100.")]
    InvalidInput,
}

/// A generated diamond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    n: u32,
    lines: Vec<String>,
}

impl Pattern {
    /// Build the diamond for `n`, clamping it into `[MIN_N, MAX_N]` first.
    pub fn new(n: i64) -> Self {
        let n = n.clamp(MIN_N, MAX_N) as u32;
        let total_lines = line_count(n);
        let max_width = max_width(n);

        let lines = (1..=total_lines)
            .map(|i| {
                let width = row_width(total_lines, i);
                let pad = ((max_width - width) / 2) as usize;
                let chars = window(i as usize - 1, width as usize);
                format!("{:pad$}{}{:pad$}", "", chars, "", pad = pad)
            })
            .collect();

        Self { n, lines }
    }

    /// The clamped size this pattern was built for.
    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Number of lines in the diamond for an already clamped `n`.
pub fn line_count(n: u32) -> u32 {
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

/// Width of the peak row, which is also the width every line is padded to.
pub fn max_width(n: u32) -> u32 {
    let peak = (line_count(n) + 1) / 2;
    2 * peak - 1
}

/// Trimmed width of line `i` (1-based) in a diamond of `total_lines` rows.
fn row_width(total_lines: u32, i: u32) -> u32 {
    let peak = (total_lines + 1) / 2;
    if i <= peak {
        2 * i - 1
    } else {
        2 * (total_lines - i) + 1
    }
}

/// `len` characters of the endlessly tiled alphabet starting at `offset`.
fn window(offset: usize, len: usize) -> String {
    ALPHABET.chars().cycle().skip(offset).take(len).collect()
}

/// Parse raw user input into a pattern size.
///
/// Surrounding whitespace is ignored. Integer literals outside the `i64`
/// range saturate rather than fail, since they clamp anyway.
pub fn parse_request(raw: &str) -> Result<i64, PatternError> {
    match raw.trim().parse::<i64>() {
        Ok(n) => Ok(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(PatternError::InvalidInput),
        },
    }
}

/// Parse `raw` and build its pattern.
pub fn try_generate(raw: &str) -> Result<Pattern, PatternError> {
    parse_request(raw).map(Pattern::new)
}

/// Parse `raw` and build its pattern as a wire result.
pub fn generate_pattern(raw: &str) -> PatternResult {
    try_generate(raw).into()
}
