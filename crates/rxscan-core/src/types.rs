// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the rxscan prescription reader.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder for a dosage, frequency or duration that no pattern matched.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Returned by the normalizer when the recognition step produced no text at all.
pub const NO_TEXT_DETECTED: &str = "No text detected";

/// Confidence values strictly above this count as a successful scan.
pub const SUCCESS_THRESHOLD: u8 = 70;

/// Accuracy shown before any scan has been recorded.
pub const DEFAULT_ACCURACY_PERCENT: u32 = 95;

/// Unique identifier for one analysed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanId(pub Uuid);

impl ScanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Heuristic score for how well the recognition pass went.
///
/// This is a proxy derived from text length or line count, not a
/// probability reported by the OCR engine. Values are capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceScore(u8);

impl ConfidenceScore {
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// A scan counts as successful only when the score is strictly above 70.
    pub fn is_successful(self) -> bool {
        self.0 > SUCCESS_THRESHOLD
    }
}

impl std::fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Which heuristic produces the [`ConfidenceScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceStrategy {
    /// Score from the character count of the text (65..=85).
    #[default]
    TextLength,
    /// Score from the number of recognised lines (60..=90).
    LineCount,
}

/// One medicine found on a single line of a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineRecord {
    /// First word of the line the medicine was found on.
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

impl std::fmt::Display for MedicineRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "💊 {}", self.name)?;
        writeln!(f, "   Dose: {}", self.dosage)?;
        writeln!(f, "   Frequency: {}", self.frequency)?;
        writeln!(f, "   Duration: {}", self.duration)
    }
}

/// Durable scan counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanStats {
    pub scans_today: u32,
    pub total_scans: u32,
    pub successful_scans: u32,
}

impl ScanStats {
    /// Share of successful scans, rounded to the nearest percent.
    ///
    /// Falls back to [`DEFAULT_ACCURACY_PERCENT`] before the first scan.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_scans == 0 {
            return DEFAULT_ACCURACY_PERCENT;
        }
        let ratio = f64::from(self.successful_scans) * 100.0 / f64::from(self.total_scans);
        ratio.round() as u32
    }

    /// Accuracy formatted for display, e.g. `"83%"`.
    pub fn accuracy_display(&self) -> String {
        format!("{}%", self.accuracy_percent())
    }
}

/// Everything produced by one pass over recognised prescription text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub id: ScanId,
    pub scanned_at: DateTime<Utc>,
    /// Text after character-confusion cleanup.
    pub normalized_text: String,
    pub confidence: ConfidenceScore,
    pub strategy: ConfidenceStrategy,
    /// Medicines found by the line-by-line analyzer.
    pub medicines: Vec<MedicineRecord>,
    /// Detailed view: medicine classes with dosage, schedule and duration.
    pub instructions: String,
    /// Analyzer view: per-line records plus dosage-form summary.
    pub analysis: String,
}

impl ScanReport {
    pub fn is_successful(&self) -> bool {
        self.confidence.is_successful()
    }

    /// Plain text suitable for the platform share sheet.
    pub fn share_text(&self) -> String {
        format!("Prescription Scan:\n\n{}", self.normalized_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_strictly_above_seventy() {
        assert!(!ConfidenceScore::new(65).is_successful());
        assert!(!ConfidenceScore::new(70).is_successful());
        assert!(ConfidenceScore::new(71).is_successful());
        assert!(ConfidenceScore::new(85).is_successful());
    }

    #[test]
    fn confidence_is_capped() {
        assert_eq!(ConfidenceScore::new(250).value(), 100);
        assert_eq!(ConfidenceScore::new(80).to_string(), "80%");
    }

    #[test]
    fn accuracy_defaults_before_first_scan() {
        let stats = ScanStats::default();
        assert_eq!(stats.accuracy_percent(), 95);
        assert_eq!(stats.accuracy_display(), "95%");
    }

    #[test]
    fn accuracy_rounds_to_nearest() {
        let stats = ScanStats {
            scans_today: 3,
            total_scans: 3,
            successful_scans: 2,
        };
        // 66.67 rounds up
        assert_eq!(stats.accuracy_percent(), 67);

        let stats = ScanStats {
            scans_today: 1,
            total_scans: 8,
            successful_scans: 1,
        };
        // 12.5 rounds away from zero
        assert_eq!(stats.accuracy_percent(), 13);
    }

    #[test]
    fn medicine_record_renders_labeled_block() {
        let record = MedicineRecord {
            name: "Paracetamol".into(),
            dosage: "500mg".into(),
            frequency: "twice daily".into(),
            duration: NOT_SPECIFIED.into(),
        };
        assert_eq!(
            record.to_string(),
            "💊 Paracetamol\n   Dose: 500mg\n   Frequency: twice daily\n   Duration: Not specified\n"
        );
    }

    #[test]
    fn strategy_serializes_snake_case() {
        let json = serde_json::to_string(&ConfidenceStrategy::LineCount).unwrap();
        assert_eq!(json, "\"line_count\"");
    }
}
