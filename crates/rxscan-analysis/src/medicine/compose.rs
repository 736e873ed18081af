// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable renderings of a prescription.
//
// Two views share the catalog but detect medicines differently:
//
// - `compose` (detailed view) matches alias groups against the whole text and
//   prints generic guidance per medicine class, followed by one consolidated
//   dosage, schedule and duration line.
// - `summarize` (analyzer view) runs the line extractor and prints dose,
//   frequency and duration for every medicine line, plus a dosage-form summary.
//
// Both are pure and never fail.

use rxscan_core::NO_TEXT_DETECTED;
use tracing::{debug, instrument};

use super::catalog::{GENERAL_PRESCRIPTION, PatternCatalog, catalog};
use super::extract::extract_with;

/// Shown when there is no text to work with.
pub const SCAN_TIPS: &str = "\
📷 No text could be read from this prescription.

💡 Tips for a better scan:
• Use bright, even lighting
• Make sure the handwriting is clear and legible
• Keep the whole prescription inside the frame
• Place it on a plain, contrasting background";

/// Closing line of every detailed view that names a medicine.
pub const DOCTOR_DISCLAIMER: &str =
    "⚠️ This is automated guidance. Always verify with your doctor or pharmacist before taking any medicine.";

/// Detailed view: medicine classes with consolidated dosing.
#[instrument(skip_all, fields(chars = text.map(str::len)))]
pub fn compose(text: Option<&str>) -> String {
    compose_with(catalog(), text)
}

/// [`compose`] against an explicit catalog.
pub fn compose_with(catalog: &PatternCatalog, text: Option<&str>) -> String {
    render_detailed(catalog, text, text)
}

/// Detailed view of one scan.
///
/// Medicine classes are looked up in both the normalized and the recognised
/// text; strength, schedule codes and treatment length only in the
/// recognised text, since normalization rewrites digits (`500mg` becomes
/// `SOOmg`, `1+0+1` becomes `I+O+I`).
#[instrument(skip_all, fields(chars = normalized.len()))]
pub fn compose_scan(normalized: &str, recognized: Option<&str>) -> String {
    render_detailed(catalog(), Some(normalized), recognized.or(Some(normalized)))
}

fn render_detailed(
    catalog: &PatternCatalog,
    text: Option<&str>,
    dosing_text: Option<&str>,
) -> String {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() && t != NO_TEXT_DETECTED => t,
        _ => return SCAN_TIPS.to_string(),
    };
    let lower = text.to_lowercase();
    let dosing = dosing_text.unwrap_or(text).to_lowercase();

    let found: Vec<_> = catalog
        .alias_groups()
        .iter()
        .filter(|group| group.matches(&lower) || group.matches(&dosing))
        .collect();
    debug!(groups = found.len(), "alias groups matched");

    if found.is_empty() {
        return format!(
            "⚠️ No known medicines recognized.\n\n\
             📝 Detected text:\n{text}\n\n\
             💡 Tip: Try clearer handwriting or a closer, sharper photo."
        );
    }

    let mut out = String::from("💊 MEDICINES IDENTIFIED:\n\n");
    for group in &found {
        out.push_str(&format!("• {}\n", group.display_name()));
        if let Some(instructions) = catalog.instructions_for(group.canonical()) {
            out.push_str(&format!("   {instructions}\n"));
        }
        out.push('\n');
    }

    if let Some(dosage) = catalog.headline_dosage(&dosing) {
        out.push_str(&format!("📏 Dosage: {dosage}\n"));
    }
    if let Some(schedule) = catalog.schedule_for(&dosing) {
        out.push_str(&format!("⏰ Schedule: {schedule}\n"));
    }
    if let Some(duration) = catalog.duration_for(&dosing) {
        out.push_str(&format!("📅 Duration: {duration}\n"));
    }

    out.push('\n');
    out.push_str(DOCTOR_DISCLAIMER);
    out
}

/// Analyzer view: one block per medicine line plus a dosage-form summary.
///
/// Reads the text as recognised; the per-line detectors need the digits.
#[instrument(skip_all, fields(chars = text.map(str::len)))]
pub fn summarize(text: Option<&str>) -> String {
    summarize_with(catalog(), text)
}

/// [`summarize`] against an explicit catalog.
pub fn summarize_with(catalog: &PatternCatalog, text: Option<&str>) -> String {
    let text = text.unwrap_or_default();
    let medicines = extract_with(catalog, text);

    let mut out = if medicines.is_empty() {
        String::from("⚠️ No specific medicines detected.\nTry scanning a clearer prescription.\n\n")
    } else {
        let mut out = format!("✅ Found {} medicine(s):\n\n", medicines.len());
        for medicine in &medicines {
            out.push_str(&format!("{medicine}\n"));
        }
        out
    };

    out.push_str("📋 Summary:\n");
    let forms = catalog.dosage_forms_in(&text.to_lowercase());
    if forms.is_empty() {
        out.push_str(&format!("• {GENERAL_PRESCRIPTION}\n"));
    } else {
        for form in forms {
            out.push_str(&format!("• {form}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_gets_scan_tips() {
        assert_eq!(compose(None), SCAN_TIPS);
        assert_eq!(compose(Some("")), SCAN_TIPS);
        assert_eq!(compose(Some("  \n ")), SCAN_TIPS);
        assert_eq!(compose(Some(NO_TEXT_DETECTED)), SCAN_TIPS);
    }

    #[test]
    fn amoxicillin_prescription_is_fully_described() {
        let out = compose(Some("Amoxicillin 500mg 1+0+1 for 7 days"));
        assert!(out.contains("Amoxicillin"), "{out}");
        assert!(out.contains("Antibiotic for infections / Take complete course"));
        assert!(out.contains("📏 Dosage: 500mg"), "{out}");
        let schedule = out
            .lines()
            .find(|l| l.starts_with("⏰ Schedule:"))
            .expect("schedule line");
        assert!(schedule.to_lowercase().contains("morning"));
        assert!(schedule.to_lowercase().contains("evening"));
        assert!(out.contains("📅 Duration: 7 days"), "{out}");
        assert!(out.ends_with(DOCTOR_DISCLAIMER));
    }

    #[test]
    fn alias_groups_are_case_insensitive_and_emitted_once() {
        let out = compose(Some("paracetamol 500mg\nPARA 1-1-1"));
        assert_eq!(out.matches("• Paracetamol").count(), 1, "{out}");
        assert!(out.contains("Morning, afternoon and evening"));
    }

    #[test]
    fn groups_follow_catalog_order() {
        let out = compose(Some("Omez 20mg\nAzithro 500mg"));
        let azithro = out.find("• Azithromycin").expect("azithromycin");
        let omez = out.find("• Omeprazole").expect("omeprazole");
        assert!(azithro < omez);
    }

    #[test]
    fn unknown_text_is_echoed_with_tip() {
        let out = compose(Some("Cetirizine at night"));
        assert!(out.starts_with("⚠️ No known medicines recognized."));
        assert!(out.contains("Cetirizine at night"));
        assert!(out.contains("clearer handwriting"));
        assert!(!out.contains(DOCTOR_DISCLAIMER));
    }

    #[test]
    fn optional_lines_are_omitted_when_absent() {
        let out = compose(Some("Vitamin B complex"));
        assert!(out.contains("• Vitamin"));
        assert!(!out.contains("Dosage:"));
        assert!(!out.contains("Schedule:"));
        assert!(!out.contains("Duration:"));
        assert!(out.ends_with(DOCTOR_DISCLAIMER));
    }

    #[test]
    fn normalized_spellings_still_match() {
        // "Cephalexin" after the l -> I fix-up
        let out = compose(Some("CephaIexin SOOmg"));
        assert!(out.contains("• Cephalexin"), "{out}");
    }

    #[test]
    fn scan_view_reads_dosing_from_recognised_text() {
        let normalized = "AmoxiciIIin SOOmg I+O+I for 7 days";
        let out = compose_scan(normalized, Some("Amoxicillin 500mg 1+0+1 for 7 days"));
        assert!(out.contains("• Amoxicillin"), "{out}");
        assert!(out.contains("📏 Dosage: 500mg"), "{out}");
        assert!(out.contains("⏰ Schedule: Morning and evening"), "{out}");
        assert!(out.contains("📅 Duration: 7 days"), "{out}");
    }

    #[test]
    fn scan_view_without_recognised_text_uses_normalized() {
        assert_eq!(compose_scan(NO_TEXT_DETECTED, None), SCAN_TIPS);

        let out = compose_scan("CephaIexin tabs", None);
        assert!(out.contains("• Cephalexin"), "{out}");
        assert!(!out.contains("Dosage:"));
    }

    #[test]
    fn summarize_blank_input_reports_no_medicines() {
        for input in [None, Some(""), Some("   ")] {
            let out = summarize(input);
            assert!(out.starts_with("⚠️ No specific medicines detected."), "{out}");
            assert!(out.contains("• General prescription"));
        }
    }

    #[test]
    fn summarize_lists_records_and_forms() {
        let text = "Paracetamol 500mg twice daily for 3 days\nAmoxicillin capsule 250mg\nSyrup 5 ml";
        let out = summarize(Some(text));
        assert!(out.starts_with("✅ Found 2 medicine(s):\n\n"), "{out}");
        assert!(out.contains(
            "💊 Paracetamol\n   Dose: 500mg\n   Frequency: twice daily\n   Duration: for 3 days\n"
        ));
        assert!(out.contains("💊 Amoxicillin\n   Dose: 250mg\n   Frequency: Not specified"));
        assert!(out.contains("• Capsules\n"));
        assert!(out.contains("• Liquid medicine\n"));
        assert!(!out.contains("General prescription"));
    }

    #[test]
    fn summarize_handles_punctuation_only() {
        let out = summarize(Some("?!.,;:"));
        assert!(out.contains("No specific medicines detected"));
    }
}
