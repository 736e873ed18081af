// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition collaborator backed by the `ocrs` crate.
//
// The analysis core only ever consumes text. This module is the optional
// adapter that turns a prescription photo into that text, plus the number of
// recognised lines for the line-count confidence strategy.
//
// # Feature Gate
//
// Only compiled with the `ocr` feature:
//
// ```toml
// rxscan-analysis = { path = "crates/rxscan-analysis", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine needs `text-detection.rten` and `text-recognition.rten`. Running
// `ocrs-cli` once downloads both into `$XDG_CACHE_HOME/ocrs` (typically
// `~/.cache/ocrs`), which is the default model directory here.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use rxscan_core::error::RxscanError;
use tracing::{debug, info, instrument};

/// Default directory for cached OCR model files.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Where to find the two model files.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Expect both model files inside `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Models in `dir`, or in the default cache when `None`.
    pub fn for_optional_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::default(),
        }
    }

    /// Check both model files exist before trying to load them.
    pub fn validate(&self) -> Result<(), RxscanError> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(RxscanError::OcrError(format!(
                    "{kind} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Text handed from the recognition step to the analysis core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedText {
    /// Recognised lines joined with `\n`.
    pub text: String,
    /// Number of non-blank lines the engine found.
    pub line_count: usize,
}

/// Prescription photo reader.
///
/// Model loading is the expensive step; build the engine once and reuse it.
/// Nothing here retries: each failure is returned once as
/// [`RxscanError::OcrError`] or [`RxscanError::ImageLoad`].
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load the detection and recognition models named in `config`.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self, RxscanError> {
        config.validate()?;

        info!("Loading OCR models");
        let detection_model = Model::load_file(&config.detection_model_path).map_err(|err| {
            RxscanError::OcrError(format!("failed to load detection model: {err}"))
        })?;
        let recognition_model =
            Model::load_file(&config.recognition_model_path).map_err(|err| {
                RxscanError::OcrError(format!("failed to load recognition model: {err}"))
            })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| RxscanError::OcrError(format!("failed to initialise engine: {err}")))?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    /// Load models from `dir`, or from the default cache when `None`.
    pub fn from_optional_dir(dir: Option<&Path>) -> Result<Self, RxscanError> {
        Self::new(OcrConfig::for_optional_dir(dir))
    }

    /// Open the photo at `path` and recognise it.
    pub fn recognize_file(&self, path: impl AsRef<Path>) -> Result<RecognizedText, RxscanError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|err| RxscanError::ImageLoad(format!("{}: {err}", path.display())))?;
        self.recognize(&image)
    }

    /// Recognise every text line in `image`.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize(&self, image: &DynamicImage) -> Result<RecognizedText, RxscanError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            RxscanError::OcrError(format!("bad image source ({width}x{height}): {err}"))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| RxscanError::OcrError(format!("preprocessing failed: {err}")))?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|err| RxscanError::OcrError(format!("word detection failed: {err}")))?;
        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        let line_texts = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|err| RxscanError::OcrError(format!("line recognition failed: {err}")))?;

        let lines: Vec<String> = line_texts
            .iter()
            .flatten()
            .map(|line| line.to_string())
            .filter(|text| !text.trim().is_empty())
            .collect();

        debug!(words = word_rects.len(), lines = lines.len(), "recognition complete");
        Ok(RecognizedText {
            line_count: lines.len(),
            text: lines.join("\n"),
        })
    }
}

/// Whether both model files are present in `dir` (default cache when `None`).
pub fn models_available(dir: Option<&Path>) -> bool {
    OcrConfig::for_optional_dir(dir).validate().is_ok()
}
