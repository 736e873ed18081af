// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-by-line medicine extraction for the analyzer view.

use rxscan_core::MedicineRecord;
use tracing::{debug, instrument};

use super::catalog::{PatternCatalog, catalog};

/// Name used when a matched line has no words to take a name from.
const FALLBACK_NAME: &str = "Medicine";

/// Find every line that mentions a common medicine.
///
/// Each line yields at most one record: the first medicine of the flat list
/// (in catalog order) found in it. The record's name is the first word of
/// the line as written, not the catalog spelling. Records follow line order.
#[instrument(skip_all, fields(chars = text.len()))]
pub fn extract(text: &str) -> Vec<MedicineRecord> {
    extract_with(catalog(), text)
}

/// [`extract`] against an explicit catalog.
pub fn extract_with(catalog: &PatternCatalog, text: &str) -> Vec<MedicineRecord> {
    let records: Vec<MedicineRecord> = text
        .lines()
        .filter_map(|line| {
            let matched = catalog.common_medicine_in(&line.to_lowercase())?;
            debug!(medicine = matched, "medicine line found");
            Some(MedicineRecord {
                name: line
                    .split_whitespace()
                    .next()
                    .unwrap_or(FALLBACK_NAME)
                    .to_string(),
                dosage: catalog.find_dosage(line).to_string(),
                frequency: catalog.find_frequency(line).to_string(),
                duration: catalog.find_duration(line).to_string(),
            })
        })
        .collect();

    debug!(count = records.len(), "extraction complete");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxscan_core::NOT_SPECIFIED;

    #[test]
    fn empty_input_yields_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\n").is_empty());
        assert!(extract("!!! ... ???").is_empty());
    }

    #[test]
    fn full_line_is_parsed() {
        let records = extract("Paracetamol 500mg 3 times a day for 5 days");
        assert_eq!(
            records,
            vec![MedicineRecord {
                name: "Paracetamol".into(),
                dosage: "500mg".into(),
                frequency: "3 times a day".into(),
                duration: "for 5 days".into(),
            }]
        );
    }

    #[test]
    fn missing_details_are_not_specified() {
        let records = extract("Tab Aspirin");
        assert_eq!(records.len(), 1);
        // first word of the line, not the medicine
        assert_eq!(records[0].name, "Tab");
        assert_eq!(records[0].dosage, NOT_SPECIFIED);
        assert_eq!(records[0].frequency, NOT_SPECIFIED);
        assert_eq!(records[0].duration, NOT_SPECIFIED);
    }

    #[test]
    fn one_record_per_line() {
        let records = extract("ibuprofen or aspirin 200mg");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ibuprofen");
    }

    #[test]
    fn records_follow_line_order() {
        let text = "Omeprazole 20mg once daily\nDr. Rao\nAmoxicillin 250mg\nMETFORMIN 500mg twice daily";
        let names: Vec<String> = extract(text).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Omeprazole", "Amoxicillin", "METFORMIN"]);
    }

    #[test]
    fn unknown_medicines_are_skipped() {
        assert!(extract("Cetirizine 10mg at night").is_empty());
    }
}
