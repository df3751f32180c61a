// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blattwerk — Core types, error definitions, and the split-point planner
// shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod planner;
pub mod types;

pub use config::ToolkitConfig;
pub use error::BlattwerkError;
pub use planner::{compute_boundaries, derive_segments, plan};
pub use types::*;
