// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rxscan-analysis — Prescription text analysis for rxscan.
//
// Cleans recognised text (glyph confusion fix-ups), scores the recognition
// pass, finds medicines with their dosage, frequency and duration, and
// renders the detailed and analyzer views. With the `ocr` feature it also
// wraps a local OCR engine as the source of that text.

pub mod medicine;
pub mod pipeline;
pub mod scan;

// Re-export the primary entry points so callers can use `rxscan_analysis::compose` etc.
pub use medicine::{PatternCatalog, catalog, compose, compose_scan, extract, summarize};
pub use pipeline::analyze_scan;
pub use scan::confidence;
pub use scan::normalize;

#[cfg(feature = "ocr")]
pub use scan::ocr::{OcrEngine, RecognizedText, models_available};
