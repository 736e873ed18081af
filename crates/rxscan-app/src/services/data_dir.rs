// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::ffi::OsString;
use std::path::PathBuf;

use rxscan_core::error::Result;

const APP_DIR: &str = "rxscan";

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> Result<PathBuf> {
    let dir = resolve(std::env::var_os("XDG_DATA_HOME"), std::env::var_os("HOME"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// XDG data dir, then `~/.local/share`, then the system temp dir.
fn resolve(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let base = match (xdg_data_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) if !home.is_empty() => PathBuf::from(home).join(".local").join("share"),
        _ => std::env::temp_dir(),
    };
    base.join(APP_DIR)
}
