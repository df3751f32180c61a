// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output fingerprints — SHA-256 digests recorded in the run manifest.

use blattwerk_core::error::BlattwerkError;
use sha2::{Digest, Sha256};

/// SHA-256 of `data` as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check `data` against an expected hex digest (case-insensitive).
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<(), BlattwerkError> {
    let actual = hash_bytes(data);
    if actual.eq_ignore_ascii_case(expected_hex.trim()) {
        Ok(())
    } else {
        Err(BlattwerkError::IntegrityMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}
