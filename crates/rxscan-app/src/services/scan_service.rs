// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer. Opens the preference store, loads the config and
// runs every scan through the analysis pipeline.
//
// The SQLite connection is `Send` but not `Sync`; the stats tracker keeps it
// behind a mutex, so the service can be cloned freely and shared across
// threads.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use rxscan_analysis::analyze_scan;
use rxscan_core::error::{Result, RxscanError};
use rxscan_core::human_errors::terminal_message;
use rxscan_core::{AppConfig, ScanReport, ScanStats};
use rxscan_store::{MemoryPreferences, PreferenceStore, ScanStatsTracker, SqlitePreferences};
use tracing::{error, info, warn};

use super::data_dir;

const PREFS_DB: &str = "prefs.db";
const CONFIG_FILE: &str = "config.json";

type StatsTracker = ScanStatsTracker<Box<dyn PreferenceStore>>;

/// Shared scan services.
///
/// All fields are cheaply cloneable (Arc-wrapped).
#[derive(Clone)]
pub struct ScanService {
    stats: Arc<StatsTracker>,
    config: Arc<Mutex<AppConfig>>,
    /// `None` when running on the in-memory fallback.
    data_dir: Option<PathBuf>,
}

impl ScanService {
    /// Open the services in the platform data directory. Call once at startup.
    pub fn init() -> Result<Self> {
        Self::open_in(data_dir::data_dir()?)
    }

    /// Open the services with `dir` as the data directory.
    pub fn open_in(dir: PathBuf) -> Result<Self> {
        info!(path = %dir.display(), "initialising scan services");

        let config = load_config(&dir);
        let store = SqlitePreferences::open(dir.join(PREFS_DB), &config.prefs_namespace)?;

        info!(namespace = store.namespace(), "scan services initialised");
        Ok(Self {
            stats: Arc::new(ScanStatsTracker::new(Box::new(store))),
            config: Arc::new(Mutex::new(config)),
            data_dir: Some(dir),
        })
    }

    /// Services with volatile counters and default settings.
    pub fn fallback() -> Self {
        Self {
            stats: Arc::new(ScanStatsTracker::new(Box::new(MemoryPreferences::new()))),
            config: Arc::new(Mutex::new(AppConfig::default())),
            data_dir: None,
        }
    }

    // -- Scanning ------------------------------------------------------------

    /// Analyse text handed over by a successful recognition pass.
    ///
    /// When `record` is set (and the config allows it) the scan counters are
    /// updated. A storage failure is logged and does not lose the report.
    pub fn process_text(
        &self,
        raw: Option<&str>,
        line_count: Option<usize>,
        record: bool,
    ) -> ScanReport {
        let config = self.config();
        let report = analyze_scan(raw, line_count, config.confidence_strategy);

        if record && config.record_stats {
            if let Err(e) = self.stats.record_scan(report.confidence) {
                warn!(error = %e, scan_id = %report.id, "failed to record scan stats");
            }
        }
        report
    }

    /// Recognise the photo at `path` and analyse the result.
    #[cfg(feature = "ocr")]
    pub fn process_image(&self, path: &Path, record: bool) -> Result<ScanReport> {
        use rxscan_analysis::OcrEngine;

        let config = self.config();
        let engine = OcrEngine::from_optional_dir(config.ocr_model_dir.as_deref())?;
        let recognized = engine.recognize_file(path)?;
        Ok(self.process_text(Some(&recognized.text), Some(recognized.line_count), record))
    }

    /// Recognise the photo at `path` and analyse the result.
    #[cfg(not(feature = "ocr"))]
    pub fn process_image(&self, path: &Path, _record: bool) -> Result<ScanReport> {
        warn!(path = %path.display(), "built without OCR support");
        Err(RxscanError::FeatureUnavailable("ocr"))
    }

    /// Turn a failed recognition pass into its terminal message.
    ///
    /// Nothing is retried and the counters are left untouched.
    pub fn process_failure(&self, err: &RxscanError) -> String {
        let message = terminal_message(err);
        error!(error = %err, "scan failed");
        message
    }

    // -- Statistics ----------------------------------------------------------

    pub fn stats(&self) -> Result<ScanStats> {
        self.stats.read_stats()
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        match &self.data_dir {
            Some(dir) => persist_config(dir, config),
            None => Err(RxscanError::Config(
                "no data directory; settings are not saved".into(),
            )),
        }
    }

    /// Whether the configured OCR model files are present.
    #[cfg(feature = "ocr")]
    pub fn ocr_models_ready(&self) -> bool {
        rxscan_analysis::models_available(self.config().ocr_model_dir.as_deref())
    }

    /// Location of the settings file, when a data directory is in use.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(CONFIG_FILE))
    }
}

// -- Config file persistence -------------------------------------------------

fn load_config(data_dir: &Path) -> AppConfig {
    let path = data_dir.join(CONFIG_FILE);
    let Ok(data) = std::fs::read_to_string(&path) else {
        return AppConfig::default();
    };
    match serde_json::from_str(&data) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
            AppConfig::default()
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxscan_core::ConfidenceStrategy;

    const PRESCRIPTION: &str = "Amoxicillin 500mg 1+0+1 for 7 days\nParacetamol 650mg twice daily";

    fn service_in(dir: &tempfile::TempDir) -> ScanService {
        ScanService::open_in(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn text_scan_updates_stats() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);

        let report = service.process_text(Some(PRESCRIPTION), None, true);
        assert!(report.is_successful());
        assert!(report.instructions.contains("MEDICINES IDENTIFIED"));

        let stats = service.stats().unwrap();
        assert_eq!(stats.total_scans, 1);
        assert_eq!(stats.scans_today, 1);
        assert_eq!(stats.successful_scans, 1);
    }

    #[test]
    fn text_scan_keeps_doses_and_schedule() {
        let service = ScanService::fallback();
        let report = service.process_text(Some(PRESCRIPTION), None, false);

        assert!(report.instructions.contains("📏 Dosage: 500mg"), "{}", report.instructions);
        assert!(report.instructions.contains("⏰ Schedule: Morning and evening"));
        assert!(report.instructions.contains("📅 Duration: 7 days"));

        let records: Vec<(&str, &str)> = report
            .medicines
            .iter()
            .map(|m| (m.name.as_str(), m.dosage.as_str()))
            .collect();
        assert_eq!(records, vec![("Amoxicillin", "500mg"), ("Paracetamol", "650mg")]);
        assert_eq!(report.medicines[1].frequency, "twice daily");
        assert!(report.analysis.contains("Found 2 medicine(s)"));
    }

    #[test]
    fn short_text_counts_but_is_not_successful() {
        let service = ScanService::fallback();
        let report = service.process_text(Some("Rx"), None, true);
        assert_eq!(report.confidence.value(), 65);

        let stats = service.stats().unwrap();
        assert_eq!(stats.total_scans, 1);
        assert_eq!(stats.successful_scans, 0);
        assert_eq!(stats.accuracy_display(), "0%");
    }

    #[test]
    fn unrecorded_scan_leaves_stats_alone() {
        let service = ScanService::fallback();
        service.process_text(Some(PRESCRIPTION), None, false);
        assert_eq!(service.stats().unwrap(), ScanStats::default());

        let mut config = service.config();
        config.record_stats = false;
        let _ = service.save_config(&config);
        service.process_text(Some(PRESCRIPTION), None, true);
        assert_eq!(service.stats().unwrap().total_scans, 0);
    }

    #[test]
    fn failure_yields_terminal_message_without_stats() {
        let service = ScanService::fallback();
        let message = service.process_failure(&RxscanError::OcrError("engine crashed".into()));
        assert_eq!(message, "OCR failed: engine crashed");
        assert_eq!(service.stats().unwrap().total_scans, 0);
    }

    #[test]
    fn stats_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let service = service_in(&dir);
            service.process_text(Some(PRESCRIPTION), None, true);
            service.process_text(Some("Rx"), None, true);
        }

        let service = service_in(&dir);
        let stats = service.stats().unwrap();
        assert_eq!(stats.total_scans, 2);
        assert_eq!(stats.successful_scans, 1);
        assert_eq!(stats.accuracy_percent(), 50);
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(&dir);

        let mut config = service.config();
        config.confidence_strategy = ConfidenceStrategy::LineCount;
        service.save_config(&config).unwrap();
        assert!(dir.path().join("config.json").exists());

        let reopened = service_in(&dir);
        assert_eq!(reopened.config().confidence_strategy, ConfidenceStrategy::LineCount);

        let report = reopened.process_text(Some("Aspirin"), Some(4), false);
        assert_eq!(report.confidence.value(), 80);
    }

    #[test]
    fn corrupt_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();
        let service = service_in(&dir);
        assert_eq!(service.config(), AppConfig::default());
    }

    #[test]
    fn fallback_cannot_persist_config() {
        let service = ScanService::fallback();
        assert!(service.config_path().is_none());
        let err = service.save_config(&AppConfig::default()).unwrap_err();
        assert!(matches!(err, RxscanError::Config(_)));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn image_scan_needs_ocr_feature() {
        let service = ScanService::fallback();
        let err = service
            .process_image(Path::new("prescription.jpg"), true)
            .unwrap_err();
        assert!(matches!(err, RxscanError::FeatureUnavailable("ocr")));
        assert_eq!(service.stats().unwrap().total_scans, 0);
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn missing_models_fail_once_with_ocr_message() {
        let models = tempfile::tempdir().unwrap();
        let service = ScanService::fallback();
        let mut config = service.config();
        config.ocr_model_dir = Some(models.path().to_path_buf());
        let _ = service.save_config(&config);

        let err = service
            .process_image(Path::new("prescription.jpg"), true)
            .unwrap_err();
        assert!(service.process_failure(&err).starts_with("OCR failed:"));
        assert_eq!(service.stats().unwrap().total_scans, 0);
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn model_readiness_follows_configured_dir() {
        let models = tempfile::tempdir().unwrap();
        let service = ScanService::fallback();
        let mut config = service.config();
        config.ocr_model_dir = Some(models.path().to_path_buf());
        let _ = service.save_config(&config);
        assert!(!service.ocr_models_ready());
    }
}
