// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognised-text intake: glyph cleanup, recognition-quality scoring, and
// the optional optical character recognition (OCR) adapter.

pub mod confidence;
pub mod normalize;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use normalize::normalize;

#[cfg(feature = "ocr")]
pub use ocr::{OcrEngine, RecognizedText};
