// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config file location.

use std::path::PathBuf;

pub const CONFIG_FILE: &str = "config.json";

/// `$XDG_CONFIG_HOME/blattwerk/config.json`, falling back to
/// `$HOME/.config/blattwerk/config.json`.
pub fn default_config_path() -> PathBuf {
    config_base(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
    )
    .join("blattwerk")
    .join(CONFIG_FILE)
}

fn config_base(xdg: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(xdg) = xdg.filter(|value| !value.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home.filter(|value| !value.is_empty()) {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}
