// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Static prescription knowledge base.
//
// Everything the extractor and the composers match against lives in one
// `PatternCatalog`, built once on first use and shared read-only by every
// caller. Text tables are matched as lowercase substrings; the three
// per-line detectors are case-insensitive regular expressions.

use std::sync::LazyLock;

use regex::Regex;
use rxscan_core::NOT_SPECIFIED;

/// Spellings of one medicine, including the ones OCR tends to produce.
///
/// `variants[0]` is the canonical name. Variants with `i` in place of `l`
/// cover text that already went through the normalizer (`l` → `I`).
#[derive(Debug)]
pub struct AliasGroup {
    pub variants: &'static [&'static str],
}

impl AliasGroup {
    pub fn canonical(&self) -> &'static str {
        self.variants[0]
    }

    /// Canonical name with its first letter upper-cased, for display.
    pub fn display_name(&self) -> String {
        let mut chars = self.canonical().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Whether any variant occurs in `lower_text` (already lowercased).
    pub fn matches(&self, lower_text: &str) -> bool {
        self.variants.iter().any(|v| lower_text.contains(v))
    }
}

/// Fixed dosing-code tokens and what they mean.
#[derive(Debug)]
pub struct ScheduleCode {
    pub tokens: &'static [&'static str],
    pub description: &'static str,
}

/// Duration tokens mapped to an explicit treatment length.
#[derive(Debug)]
pub struct DurationToken {
    pub tokens: &'static [&'static str],
    pub label: &'static str,
}

/// Keywords that reveal how a medicine is given.
#[derive(Debug)]
pub struct DosageForm {
    pub keywords: &'static [&'static str],
    pub label: &'static str,
}

const ALIAS_GROUPS: &[AliasGroup] = &[
    AliasGroup {
        variants: &["amoxicillin", "amoxiciiiin", "amoxicilin", "amoxiciiin", "amoxycillin", "amox"],
    },
    AliasGroup {
        variants: &["paracetamol", "paracetamoi", "paracetmol", "paracetmoi", "pcm", "para"],
    },
    AliasGroup {
        variants: &["vitamin", "b-complex", "b-compiex", "b complex", "b compiex", "bcomplex", "vit"],
    },
    AliasGroup {
        variants: &["cephalexin", "cephaiexin", "cefalexin", "cefaiexin", "cephalex", "cephaiex"],
    },
    AliasGroup {
        variants: &["azithromycin", "azithromycine", "azitromycin", "azithro", "azee"],
    },
    AliasGroup {
        variants: &["omeprazole", "omeprazoie", "omeprazol", "omeprazoi", "omez"],
    },
];

/// Generic guidance per canonical name.
const INSTRUCTIONS: &[(&str, &str)] = &[
    ("amoxicillin", "Antibiotic for infections / Take complete course"),
    ("paracetamol", "Pain and fever relief / Take after food, no more than 4 doses a day"),
    ("vitamin", "Vitamin supplement / Take after meals"),
    ("cephalexin", "Antibiotic for bacterial infections / Take complete course"),
    ("azithromycin", "Antibiotic / Take 1 hour before or 2 hours after food"),
    ("omeprazole", "Reduces stomach acid / Take 30 minutes before breakfast"),
];

/// Flat list scanned line by line by the analyzer view.
const COMMON_MEDICINES: &[&str] = &[
    "paracetamol",
    "ibuprofen",
    "aspirin",
    "amoxicillin",
    "azithromycin",
    "metformin",
    "insulin",
    "atorvastatin",
    "losartan",
    "amlodipine",
    "omeprazole",
    "levothyroxine",
];

/// Checked in order; the first hit wins.
const SCHEDULE_CODES: &[ScheduleCode] = &[
    ScheduleCode {
        tokens: &["1+0+1", "1-0-1"],
        description: "Morning and evening",
    },
    ScheduleCode {
        tokens: &["1+1+1", "1-1-1"],
        description: "Morning, afternoon and evening",
    },
    ScheduleCode {
        tokens: &["0+0+1", "0-0-1"],
        description: "Evening only",
    },
    ScheduleCode {
        tokens: &["bd", "b.d", "bid"],
        description: "Twice daily",
    },
    ScheduleCode {
        tokens: &["tds", "t.d.s", "tid"],
        description: "Three times daily",
    },
    ScheduleCode {
        tokens: &["once", "1 time"],
        description: "Once daily",
    },
];

const DURATION_TOKENS: &[DurationToken] = &[
    DurationToken {
        tokens: &["7 days", "7day"],
        label: "7 days",
    },
    DurationToken {
        tokens: &["5 days", "5day"],
        label: "5 days",
    },
    DurationToken {
        tokens: &["3 days", "3day"],
        label: "3 days",
    },
    DurationToken {
        tokens: &["10 days", "10day"],
        label: "10 days",
    },
];

/// Used when "day" appears but no explicit length matched.
const DURATION_FALLBACK: &str = "As prescribed";

/// Strength tokens for the detailed view, highest priority first.
const HEADLINE_DOSAGES: &[&str] = &["500mg", "250mg", "100mg"];
const MG_PRESENT: &str = "As written (strength in mg)";

const DOSAGE_FORMS: &[DosageForm] = &[
    DosageForm {
        keywords: &["tablet", "tab"],
        label: "Oral tablets",
    },
    DosageForm {
        keywords: &["capsule", "cap"],
        label: "Capsules",
    },
    DosageForm {
        keywords: &["syrup", "suspension"],
        label: "Liquid medicine",
    },
    DosageForm {
        keywords: &["injection", "inj"],
        label: "Injections",
    },
    DosageForm {
        keywords: &["ointment", "cream"],
        label: "Topical application",
    },
];

/// Shown when no dosage-form keyword matched.
pub const GENERAL_PRESCRIPTION: &str = "General prescription";

/// The shared, immutable pattern tables.
pub struct PatternCatalog {
    alias_groups: &'static [AliasGroup],
    instructions: &'static [(&'static str, &'static str)],
    common_medicines: &'static [&'static str],
    schedule_codes: &'static [ScheduleCode],
    duration_tokens: &'static [DurationToken],
    dosage_forms: &'static [DosageForm],
    dosage: Regex,
    frequency: Regex,
    duration: Regex,
}

static CATALOG: LazyLock<PatternCatalog> = LazyLock::new(PatternCatalog::build);

/// The process-wide catalog.
pub fn catalog() -> &'static PatternCatalog {
    &CATALOG
}

impl PatternCatalog {
    fn build() -> Self {
        Self {
            alias_groups: ALIAS_GROUPS,
            instructions: INSTRUCTIONS,
            common_medicines: COMMON_MEDICINES,
            schedule_codes: SCHEDULE_CODES,
            duration_tokens: DURATION_TOKENS,
            dosage_forms: DOSAGE_FORMS,
            dosage: Regex::new(r"(?i)\d+\s*(?:mg|g|ml|tablet|tab)s?").expect("valid regex"),
            frequency: Regex::new(r"(?i)\d+ times? (?:a|per) day|once daily|twice daily")
                .expect("valid regex"),
            duration: Regex::new(r"(?i)for \d+ days?|\d+ days? course").expect("valid regex"),
        }
    }

    pub fn alias_groups(&self) -> &[AliasGroup] {
        self.alias_groups
    }

    /// Generic guidance for a canonical medicine name.
    pub fn instructions_for(&self, canonical: &str) -> Option<&'static str> {
        self.instructions
            .iter()
            .find(|(name, _)| *name == canonical)
            .map(|(_, text)| *text)
    }

    /// First entry of the flat medicine list found in `lower_line`.
    pub fn common_medicine_in(&self, lower_line: &str) -> Option<&'static str> {
        self.common_medicines
            .iter()
            .copied()
            .find(|med| lower_line.contains(med))
    }

    /// Strength such as `500mg` or `2 tablets`, or [`NOT_SPECIFIED`].
    pub fn find_dosage<'a>(&self, text: &'a str) -> &'a str {
        first_match(&self.dosage, text)
    }

    /// `3 times a day`, `once daily`, `twice daily`, or [`NOT_SPECIFIED`].
    pub fn find_frequency<'a>(&self, text: &'a str) -> &'a str {
        first_match(&self.frequency, text)
    }

    /// `for 5 days`, `7 days course`, or [`NOT_SPECIFIED`].
    pub fn find_duration<'a>(&self, text: &'a str) -> &'a str {
        first_match(&self.duration, text)
    }

    /// Consolidated strength for the detailed view.
    pub fn headline_dosage(&self, lower_text: &str) -> Option<&'static str> {
        HEADLINE_DOSAGES
            .iter()
            .copied()
            .find(|token| lower_text.contains(token))
            .or_else(|| lower_text.contains("mg").then_some(MG_PRESENT))
    }

    /// Meaning of the first schedule code present, in table order.
    pub fn schedule_for(&self, lower_text: &str) -> Option<&'static str> {
        self.schedule_codes
            .iter()
            .find(|code| code.tokens.iter().any(|t| lower_text.contains(t)))
            .map(|code| code.description)
    }

    /// Treatment length, "As prescribed" for any other mention of days.
    pub fn duration_for(&self, lower_text: &str) -> Option<&'static str> {
        self.duration_tokens
            .iter()
            .find(|entry| entry.tokens.iter().any(|t| lower_text.contains(t)))
            .map(|entry| entry.label)
            .or_else(|| lower_text.contains("day").then_some(DURATION_FALLBACK))
    }

    /// Labels of every dosage form mentioned, in table order.
    pub fn dosage_forms_in(&self, lower_text: &str) -> Vec<&'static str> {
        self.dosage_forms
            .iter()
            .filter(|form| form.keywords.iter().any(|k| lower_text.contains(k)))
            .map(|form| form.label)
            .collect()
    }
}

fn first_match<'a>(pattern: &Regex, text: &'a str) -> &'a str {
    pattern.find(text).map_or(NOT_SPECIFIED, |m| m.as_str())
}
