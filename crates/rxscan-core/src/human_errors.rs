// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people scanning their own prescriptions.
//
// Every technical error is mapped to plain English with a clear suggestion.
// A failed scan is never retried automatically; `retriable` only tells the
// UI whether offering a "Scan again" button makes sense.

use crate::error::RxscanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A better photo will probably fix it.
    Rescan,
    /// Something on this device needs attention (models, storage, settings).
    ActionRequired,
    /// Cannot be fixed by the user from within the app.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether scanning again is worth offering.
    pub retriable: bool,
    pub severity: Severity,
}

/// The single terminal line reported to the caller for a failed scan.
///
/// Matches the error's `Display` form, e.g. `"OCR failed: model not found"`.
pub fn terminal_message(err: &RxscanError) -> String {
    err.to_string()
}

/// Convert an `RxscanError` into a `HumanError`.
pub fn humanize_error(err: &RxscanError) -> HumanError {
    match err {
        RxscanError::ImageLoad(_) => HumanError {
            message: "We couldn't open this photo.".into(),
            suggestion: "Take the picture again, or pick a JPEG or PNG image of the prescription.".into(),
            retriable: true,
            severity: Severity::Rescan,
        },

        RxscanError::OcrError(detail) => {
            let lower = detail.to_lowercase();
            if lower.contains("model") {
                HumanError {
                    message: "Text recognition isn't set up yet.".into(),
                    suggestion: format!(
                        "The recognition models could not be loaded. Check the model directory in the settings. ({detail})"
                    ),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "We couldn't read the text on this prescription.".into(),
                    suggestion: "Scan again in good light, hold the camera steady, and keep the whole prescription in the frame.".into(),
                    retriable: true,
                    severity: Severity::Rescan,
                }
            }
        }

        RxscanError::Database(_) => HumanError {
            message: "Your scan history couldn't be saved.".into(),
            suggestion: "The result is still shown. If this keeps happening, free up some storage space on this device.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RxscanError::Config(detail) => HumanError {
            message: "The app settings look damaged.".into(),
            suggestion: format!("Reset the settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RxscanError::Io(_) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: "Check that the file exists and that there is enough free storage space.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        RxscanError::Serialization(_) => HumanError {
            message: "Some saved data couldn't be understood.".into(),
            suggestion: "Reset the settings to their defaults and try again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RxscanError::FeatureUnavailable(feature) => HumanError {
            message: "This feature isn't available in this version.".into(),
            suggestion: format!("Paste the prescription text instead. (Missing: {feature})"),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_message_keeps_ocr_prefix() {
        let err = RxscanError::OcrError("engine crashed".into());
        assert_eq!(terminal_message(&err), "OCR failed: engine crashed");
    }

    #[test]
    fn unreadable_image_suggests_rescan() {
        let err = RxscanError::ImageLoad("truncated JPEG".into());
        assert_eq!(terminal_message(&err), "Failed to load image: truncated JPEG");
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Rescan);
        assert!(human.retriable);
    }

    #[test]
    fn missing_models_need_action() {
        let err = RxscanError::OcrError("detection model not found at /x".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn recognition_failure_is_rescan() {
        let err = RxscanError::OcrError("line recognition failed".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Rescan);
    }

    #[test]
    fn missing_feature_is_permanent() {
        let human = humanize_error(&RxscanError::FeatureUnavailable("ocr"));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("ocr"));
    }
}
