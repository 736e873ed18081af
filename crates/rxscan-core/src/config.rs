// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfidenceStrategy;

/// Namespace under which the scan counters are stored.
pub const DEFAULT_PREFS_NAMESPACE: &str = "PrescriptionPrefs";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Heuristic used to score each recognition pass.
    pub confidence_strategy: ConfidenceStrategy,
    /// Preference-store namespace holding the scan counters.
    pub prefs_namespace: String,
    /// Update the scan counters after each analysed scan.
    pub record_stats: bool,
    /// Directory holding the OCR model files (engine default when unset).
    pub ocr_model_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            confidence_strategy: ConfidenceStrategy::TextLength,
            prefs_namespace: DEFAULT_PREFS_NAMESPACE.to_string(),
            record_stats: true,
            ocr_model_dir: None,
        }
    }
}
