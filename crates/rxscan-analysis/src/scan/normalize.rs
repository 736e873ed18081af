// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-wise cleanup of recognised text.
//
// OCR engines regularly confuse glyphs that look alike on a phone photo of
// handwriting (`|` vs `I`, `0` vs `O`, ...). Each line is trimmed, run through
// an ordered substitution chain, and dropped if fewer than two characters
// survive.

use rxscan_core::NO_TEXT_DETECTED;
use tracing::debug;

/// Glyph substitutions, applied in order.
///
/// Each step sees the output of the previous one, so the order is part of the
/// behaviour and must not be changed into a map.
const CONFUSION_FIXES: &[(&str, &str)] = &[
    ("|", "I"),
    ("0", "O"),
    ("1", "I"),
    ("5", "S"),
    ("8", "B"),
    ("l", "I"),
];

/// Lines shorter than this after cleaning are treated as noise.
const MIN_LINE_CHARS: usize = 2;

/// Clean raw recognised text.
///
/// Returns [`NO_TEXT_DETECTED`] when the recognition step produced nothing at
/// all (`None`). Blank input, or input made only of noise lines, yields an
/// empty string instead, so callers can tell the two apart.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NO_TEXT_DETECTED.to_string();
    };

    let lines: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(clean_line)
        .filter(|line| line.chars().count() >= MIN_LINE_CHARS)
        .collect();

    debug!(kept_lines = lines.len(), "normalized recognised text");
    lines.join("\n").trim().to_string()
}

/// Apply the substitution chain to one trimmed line.
fn clean_line(line: &str) -> String {
    CONFUSION_FIXES
        .iter()
        .fold(line.to_string(), |acc, (from, to)| acc.replace(from, to))
        .trim()
        .to_string()
}
