// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode, resize, re-encode, and compress images to a target size.

pub mod compressor;
pub mod processor;

pub use compressor::ImageCompressor;
pub use processor::ImageProcessor;
