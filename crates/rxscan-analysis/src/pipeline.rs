// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One pass from recognised text to a complete `ScanReport`.
//
// raw text -> normalized text -> confidence, medicine classes (detailed view)
//          -> medicine records, dosing details -> analyzer view + detailed view
//
// Normalization rewrites digits, so anything that reads strengths, schedule
// codes or day counts works on the recognised text instead.

use chrono::Utc;
use rxscan_core::{ConfidenceStrategy, ScanId, ScanReport};
use tracing::{info, instrument};

use crate::medicine::{compose_scan, extract, summarize};
use crate::scan::{confidence, normalize};

/// Analyse the text handed over by the recognition step.
///
/// `line_count` is the number of lines the engine reported, when it reports
/// one; the line-count strategy falls back to counting normalized lines.
/// Never fails, whatever the input.
#[instrument(skip(raw), fields(has_text = raw.is_some()))]
pub fn analyze_scan(
    raw: Option<&str>,
    line_count: Option<usize>,
    strategy: ConfidenceStrategy,
) -> ScanReport {
    let normalized = normalize(raw);
    // The "No text detected" sentinel is not recognised text.
    let scored_text = if raw.is_some() { normalized.as_str() } else { "" };
    let confidence = confidence::estimate_with(strategy, scored_text, line_count);

    let recognized = raw.map(str::trim);
    let medicines = extract(recognized.unwrap_or_default());
    let instructions = compose_scan(&normalized, recognized);
    let analysis = summarize(recognized);

    let report = ScanReport {
        id: ScanId::new(),
        scanned_at: Utc::now(),
        normalized_text: normalized,
        confidence,
        strategy,
        medicines,
        instructions,
        analysis,
    };
    info!(
        scan_id = %report.id,
        confidence = report.confidence.value(),
        medicines = report.medicines.len(),
        "scan analysed"
    );
    report
}
