// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! rxscan-store — durable counters for the prescription scanner.
//!
//! Preferences live in a small SQLite database keyed by namespace, and the
//! stats tracker updates the scan counters on top of them. Any
//! `PreferenceStore` can back the tracker, so tests and the no-disk fallback
//! use the in-memory store instead.

pub mod prefs;
pub mod stats;

pub use prefs::{MemoryPreferences, PreferenceStore, SqlitePreferences};
pub use stats::ScanStatsTracker;
