// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the loaded configuration and the output
// directory, and exposes one method per tool for the CLI to call.
//
// Every method reads its inputs from disk, runs intake checks, hands the bytes
// to the document crate, and writes the results into the output directory.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::{Segment, SplitMode, SplitPlan, ToolkitConfig, planner};
use blattwerk_document::integrity::{hash_bytes, verify_hash};
use blattwerk_document::intake::{self, IntakeLimits};
use blattwerk_document::{
    CompressedImage, CompressionOptions, HeaderFooter, ImageCompressor, MergeOutcome, PdfMerger,
    PdfReader, PdfSplitter, SplitRequest,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Everything the split tool needs from the command line.
#[derive(Debug, Clone, Default)]
pub struct SplitJob {
    pub input: PathBuf,
    /// `None` falls back to the configured default mode.
    pub mode: Option<SplitMode>,
    pub specification: String,
    pub header: Option<PathBuf>,
    pub footer: Option<PathBuf>,
    /// Set by `--no-header-footer`.
    pub skip_header_footer: bool,
    pub write_manifest: bool,
}

/// Options for the image tool; unset fields come from the config.
#[derive(Debug, Clone, Default)]
pub struct CompressJob {
    pub input: PathBuf,
    pub target_kb: Option<u32>,
    pub format: Option<blattwerk_core::ImageFormatChoice>,
    pub max_dimension: Option<u32>,
}

/// One file written by a tool run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub file_name: String,
    /// 1-based inclusive page range, for split outputs.
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
    pub size_bytes: u64,
    pub sha256: String,
}

impl OutputRecord {
    fn new(file_name: &str, bytes: &[u8], pages: Option<Segment>) -> Self {
        Self {
            file_name: file_name.to_string(),
            first_page: pages.map(|segment| segment.start + 1),
            last_page: pages.map(|segment| segment.end),
            size_bytes: bytes.len() as u64,
            sha256: hash_bytes(bytes),
        }
    }
}

/// JSON record of one run, written as `manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub tool: String,
    pub created_at: DateTime<Utc>,
    pub inputs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<SplitPlan>,
    pub outputs: Vec<OutputRecord>,
}

#[derive(Debug, Clone)]
pub struct SplitReport {
    pub plan: SplitPlan,
    pub outputs: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct MergeReport {
    pub output: PathBuf,
    pub outcome: MergeOutcome,
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CompressReport {
    pub output: PathBuf,
    pub original_size: u64,
    pub image: CompressedImage,
}

/// Shared services for all CLI commands.
pub struct ToolkitServices {
    config: ToolkitConfig,
    output_dir: PathBuf,
}

impl ToolkitServices {
    pub fn new(config: ToolkitConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            output_dir: output_dir.into(),
        }
    }

    /// Load the config from `config_path` (defaults when missing) and bind
    /// the output directory.
    pub fn init(config_path: &Path, output_dir: impl Into<PathBuf>) -> Self {
        let config = match load_config(config_path) {
            Some(config) => {
                info!(path = %config_path.display(), "Config loaded");
                config
            }
            None => {
                debug!(path = %config_path.display(), "No usable config, using defaults");
                ToolkitConfig::default()
            }
        };
        Self::new(config, output_dir)
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn limits(&self) -> IntakeLimits {
        IntakeLimits::from(&self.config)
    }

    // -- Plan -----------------------------------------------------------------

    /// `None` falls back to the configured default mode, as split does.
    pub fn plan(&self, page_count: u32, mode: Option<SplitMode>, specification: &str) -> SplitPlan {
        let mode = mode.unwrap_or(self.config.default_split_mode);
        planner::plan(page_count, mode, specification)
    }

    // -- Split ----------------------------------------------------------------

    pub fn split(&self, job: &SplitJob) -> Result<SplitReport> {
        let input_name = display_name(&job.input);
        let data = fs::read(&job.input)?;
        intake::validate_pdf(&input_name, &data, &self.limits())?;

        let mode = job.mode.unwrap_or(self.config.default_split_mode);
        let mut request = SplitRequest::new(mode, job.specification.clone());
        if let Some(overlay) = self.load_overlay(job)? {
            request = request.with_overlay(overlay);
        }

        let reader = PdfReader::from_bytes(&data)?;
        let outcome = PdfSplitter::split(&reader, &request)?;

        self.ensure_output_dir()?;
        let mut outputs = Vec::with_capacity(outcome.documents.len());
        let mut records = Vec::with_capacity(outcome.documents.len());
        for document in &outcome.documents {
            let record = OutputRecord::new(
                &document.file_name,
                &document.bytes,
                Some(document.segment),
            );
            outputs.push(self.write_verified(&record, &document.bytes)?);
            records.push(record);
        }

        let manifest = if job.write_manifest || self.config.write_manifest {
            Some(self.write_manifest(RunManifest {
                tool: "split".to_string(),
                created_at: Utc::now(),
                inputs: vec![input_name],
                plan: Some(outcome.plan.clone()),
                outputs: records,
            })?)
        } else {
            None
        };

        info!(outputs = outputs.len(), "Split written");
        Ok(SplitReport {
            plan: outcome.plan,
            outputs,
            manifest,
        })
    }

    fn load_overlay(&self, job: &SplitJob) -> Result<Option<HeaderFooter>> {
        if job.header.is_none() && job.footer.is_none() {
            return Ok(None);
        }
        if job.skip_header_footer || !self.config.add_header_footer {
            info!("Header/footer stamping disabled, ignoring overlay files");
            return Ok(None);
        }

        let header = read_overlay(job.header.as_deref())?;
        let footer = read_overlay(job.footer.as_deref())?;
        let overlay = HeaderFooter::load(header.as_deref(), footer.as_deref())?;
        Ok((!overlay.is_empty()).then_some(overlay))
    }

    // -- Merge ----------------------------------------------------------------

    pub fn merge(&self, inputs: &[PathBuf], file_name: &str) -> Result<MergeReport> {
        check_output_name(file_name)?;
        let limits = self.limits();
        let mut loaded = Vec::with_capacity(inputs.len());
        for path in inputs {
            let name = display_name(path);
            let data = fs::read(path)?;
            intake::validate_size(&name, &data, &limits)?;
            loaded.push((name, data));
        }

        let outcome = PdfMerger::merge(&loaded)?;
        for name in &outcome.skipped {
            warn!(name = name.as_str(), "Input left out of merge");
        }

        self.ensure_output_dir()?;
        let record = OutputRecord::new(file_name, &outcome.bytes, None);
        let output = self.write_verified(&record, &outcome.bytes)?;

        let manifest = if self.config.write_manifest {
            Some(self.write_manifest(RunManifest {
                tool: "merge".to_string(),
                created_at: Utc::now(),
                inputs: outcome.merged.clone(),
                plan: None,
                outputs: vec![record],
            })?)
        } else {
            None
        };

        Ok(MergeReport {
            output,
            outcome,
            manifest,
        })
    }

    // -- Image compression ----------------------------------------------------

    pub fn compress_image(&self, job: &CompressJob) -> Result<CompressReport> {
        let name = display_name(&job.input);
        let data = fs::read(&job.input)?;
        intake::validate_image(&name, &data, &self.limits())?;

        let options = CompressionOptions {
            target_kb: job.target_kb.unwrap_or(self.config.image_target_kb),
            max_dimension: job.max_dimension.unwrap_or(self.config.image_max_dimension),
            format: job.format.unwrap_or(self.config.image_format),
            min_quality: self.config.jpeg_min_quality,
        };
        let image = ImageCompressor::compress(&data, &options)?;

        let stem = job
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let file_name = format!("{stem}_compressed.{}", image.format.extension());

        self.ensure_output_dir()?;
        let output = self.write_output(&file_name, &image.bytes)?;

        Ok(CompressReport {
            output,
            original_size: data.len() as u64,
            image,
        })
    }

    // -- Output helpers -------------------------------------------------------

    fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    fn write_output(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), size = bytes.len(), "Output written");
        Ok(path)
    }

    /// Write `bytes` and read them back against the digest in `record`.
    fn write_verified(&self, record: &OutputRecord, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.write_output(&record.file_name, bytes)?;
        verify_hash(&fs::read(&path)?, &record.sha256)?;
        Ok(path)
    }

    fn write_manifest(&self, manifest: RunManifest) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(&manifest)?;
        self.write_output(MANIFEST_FILE, json.as_bytes())
    }
}

fn read_overlay(path: Option<&Path>) -> Result<Option<Vec<u8>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let data = fs::read(path)?;
    intake::validate_overlay(&display_name(path), &data)?;
    Ok(Some(data))
}

/// Output names must be a bare file name inside the output directory.
fn check_output_name(file_name: &str) -> Result<()> {
    let bare = Path::new(file_name).file_name() == Some(OsStr::new(file_name));
    if bare && file_name != "." && file_name != ".." {
        Ok(())
    } else {
        Err(BlattwerkError::InvalidOption(format!(
            "output name must be a plain file name, got {file_name:?}"
        )))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// -- Config persistence -------------------------------------------------------

pub fn load_config(path: &Path) -> Option<ToolkitConfig> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(path = %path.display(), %err, "Ignoring unreadable config");
            None
        }
    }
}

pub fn persist_config(path: &Path, config: &ToolkitConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}
