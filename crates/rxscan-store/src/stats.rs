// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan counters.
//
// After every completed recognition pass the tracker bumps `scans_today` and
// `total_scans`, and `successful_scans` when the confidence is above 70.
// `scans_today` starts again from zero on the first scan whose day-of-year
// differs from the stored last-scan day. The check and the increments run
// under one lock and are committed as one store transaction, so concurrent
// scans never lose an update.

use std::sync::Mutex;

use chrono::{DateTime, Datelike, Local, TimeZone};
use rxscan_core::error::{Result, RxscanError};
use rxscan_core::{ConfidenceScore, ScanStats};
use tracing::{debug, info, instrument};

use crate::prefs::PreferenceStore;

/// Fixed preference keys.
pub mod keys {
    pub const SCANS_TODAY: &str = "scans_today";
    pub const TOTAL_SCANS: &str = "total_scans";
    pub const SUCCESSFUL_SCANS: &str = "successful_scans";
    /// Epoch milliseconds of the scan that opened the current day.
    pub const LAST_SCAN_DATE: &str = "last_scan_date";
}

/// Process-wide scan statistics over a durable store.
pub struct ScanStatsTracker<S> {
    store: Mutex<S>,
}

impl<S: PreferenceStore> ScanStatsTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Record one completed scan at the current local time.
    pub fn record_scan(&self, confidence: ConfidenceScore) -> Result<ScanStats> {
        self.record_scan_at(confidence, Local::now())
    }

    /// Record one completed scan as if it finished at `now`.
    ///
    /// Returns the counters as stored after the update.
    #[instrument(skip(self, now), fields(confidence = confidence.value()))]
    pub fn record_scan_at(
        &self,
        confidence: ConfidenceScore,
        now: DateTime<Local>,
    ) -> Result<ScanStats> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| RxscanError::Database("stats lock poisoned".into()))?;

        let last_scan = store.get_i64(keys::LAST_SCAN_DATE)?.unwrap_or(0);
        let mut scans_today = store.get_i64(keys::SCANS_TODAY)?.unwrap_or(0);
        let mut total_scans = store.get_i64(keys::TOTAL_SCANS)?.unwrap_or(0);
        let mut successful_scans = store.get_i64(keys::SUCCESSFUL_SCANS)?.unwrap_or(0);

        let mut edits = Vec::with_capacity(4);
        if !same_day_of_year(last_scan, &now) {
            debug!("new day, resetting today's count");
            scans_today = 0;
            edits.push((keys::LAST_SCAN_DATE, now.timestamp_millis()));
        }

        scans_today += 1;
        total_scans += 1;
        edits.push((keys::SCANS_TODAY, scans_today));
        edits.push((keys::TOTAL_SCANS, total_scans));

        if confidence.is_successful() {
            successful_scans += 1;
            edits.push((keys::SUCCESSFUL_SCANS, successful_scans));
        }

        store.commit(&edits)?;

        let stats = ScanStats {
            scans_today: to_count(scans_today),
            total_scans: to_count(total_scans),
            successful_scans: to_count(successful_scans),
        };
        info!(
            scans_today = stats.scans_today,
            total_scans = stats.total_scans,
            successful = confidence.is_successful(),
            "scan recorded"
        );
        Ok(stats)
    }

    /// Current counters as stored.
    pub fn read_stats(&self) -> Result<ScanStats> {
        let store = self
            .store
            .lock()
            .map_err(|_| RxscanError::Database("stats lock poisoned".into()))?;

        Ok(ScanStats {
            scans_today: to_count(store.get_i64(keys::SCANS_TODAY)?.unwrap_or(0)),
            total_scans: to_count(store.get_i64(keys::TOTAL_SCANS)?.unwrap_or(0)),
            successful_scans: to_count(store.get_i64(keys::SUCCESSFUL_SCANS)?.unwrap_or(0)),
        })
    }
}

/// Whether the stored timestamp falls on the same day-of-year as `now`.
///
/// Only the day-of-year is compared, not the year.
fn same_day_of_year(last_scan_millis: i64, now: &DateTime<Local>) -> bool {
    Local
        .timestamp_millis_opt(last_scan_millis)
        .single()
        .is_some_and(|last| last.ordinal() == now.ordinal())
}

fn to_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
