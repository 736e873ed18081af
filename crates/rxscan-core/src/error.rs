// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for rxscan.
//
// Text analysis never fails: blank input, unknown medicines and patterns that
// do not match are ordinary outcomes with their own messages. The variants
// below cover the collaborators around the analysis core (recognition engine,
// preference storage, configuration files).

use thiserror::Error;

/// Top-level error type for all rxscan operations.
#[derive(Debug, Error)]
pub enum RxscanError {
    // -- Recognition collaborator --
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("feature not available in this build: {0}")]
    FeatureUnavailable(&'static str),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RxscanError>;
