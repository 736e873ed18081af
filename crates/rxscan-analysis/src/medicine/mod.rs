// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Medicine knowledge base, line extraction, and the two text renderings.

pub mod catalog;
pub mod compose;
pub mod extract;

pub use catalog::{PatternCatalog, catalog};
pub use compose::{compose, compose_scan, summarize};
pub use extract::extract;
