// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition-quality heuristics.
//
// The recognition collaborator does not report a usable per-block confidence,
// so the score is a proxy: more recognised text (or more recognised lines)
// is taken as a sign of a cleaner photo. Neither strategy looks at what the
// text says. The thresholds feed the "successful scan" statistics (> 70) and
// must stay exactly as they are.

use rxscan_core::{ConfidenceScore, ConfidenceStrategy};

/// (exclusive lower bound on character count, score), highest first.
const LENGTH_TIERS: &[(usize, u8)] = &[(100, 85), (50, 80), (20, 75), (10, 70)];
const LENGTH_FLOOR: u8 = 65;

/// (exclusive lower bound on line count, score), highest first.
const LINE_TIERS: &[(usize, u8)] = &[(5, 90), (3, 80), (1, 70)];
const LINE_FLOOR: u8 = 60;

/// Score from the number of characters in the text: 65, 70, 75, 80 or 85.
pub fn by_text_length(text: &str) -> ConfidenceScore {
    tiered(text.chars().count(), LENGTH_TIERS, LENGTH_FLOOR)
}

/// Score from the number of recognised lines: 60, 70, 80 or 90.
pub fn by_line_count(line_count: usize) -> ConfidenceScore {
    tiered(line_count, LINE_TIERS, LINE_FLOOR)
}

/// Score `text`, using the line-count strategy when a count is available.
pub fn estimate(text: &str, line_count: Option<usize>) -> ConfidenceScore {
    match line_count {
        Some(lines) => by_line_count(lines),
        None => by_text_length(text),
    }
}

/// Score `text` with an explicitly chosen strategy.
///
/// With [`ConfidenceStrategy::LineCount`] and no count from the recognition
/// engine, the lines of `text` itself are counted.
pub fn estimate_with(
    strategy: ConfidenceStrategy,
    text: &str,
    line_count: Option<usize>,
) -> ConfidenceScore {
    match strategy {
        ConfidenceStrategy::TextLength => by_text_length(text),
        ConfidenceStrategy::LineCount => {
            by_line_count(line_count.unwrap_or_else(|| text.lines().count()))
        }
    }
}

fn tiered(measure: usize, tiers: &[(usize, u8)], floor: u8) -> ConfidenceScore {
    let score = tiers
        .iter()
        .find(|(above, _)| measure > *above)
        .map_or(floor, |(_, score)| *score);
    ConfidenceScore::new(score)
}
