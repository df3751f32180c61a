// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface definition.

use std::path::PathBuf;

use blattwerk_core::{ImageFormatChoice, SplitMode};
use blattwerk_document::MERGED_FILE_NAME;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blattwerk")]
#[command(about = "Split, merge and stamp PDFs, and compress images, entirely offline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output directory for generated files
    #[arg(short, long, global = true, default_value = "./output")]
    pub output: PathBuf,

    /// Config file (defaults to $XDG_CONFIG_HOME/blattwerk/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show where a document would be split, without reading any file
    Plan(PlanArgs),

    /// Split a PDF into several documents
    Split(SplitArgs),

    /// Merge several PDFs into one
    Merge(MergeArgs),

    /// Compress an image towards a target file size
    CompressImage(CompressImageArgs),

    /// Write the effective settings to the config file
    InitConfig,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Number of pages in the document
    #[arg(value_name = "PAGES")]
    pub pages: u32,

    /// Split mode: single, multiple or range (defaults to the config value)
    #[arg(short, long)]
    pub mode: Option<SplitMode>,

    /// Page number, chunk size, or pages to cut after (e.g. "3,7" or "2-4")
    #[arg(short, long, default_value = "")]
    pub spec: String,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SplitArgs {
    /// PDF to split
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Split mode: single, multiple or range (defaults to the config value)
    #[arg(short, long)]
    pub mode: Option<SplitMode>,

    /// Page number, chunk size, or pages to cut after (e.g. "3,7" or "2-4")
    #[arg(short, long, default_value = "")]
    pub spec: String,

    /// Image stamped across the top of every output page
    #[arg(long, value_name = "IMAGE")]
    pub header: Option<PathBuf>,

    /// Image stamped across the bottom of every output page
    #[arg(long, value_name = "IMAGE")]
    pub footer: Option<PathBuf>,

    /// Do not stamp header/footer images even when given
    #[arg(long)]
    pub no_header_footer: bool,

    /// Write manifest.json next to the outputs
    #[arg(long)]
    pub manifest: bool,
}

#[derive(Args)]
pub struct MergeArgs {
    /// PDFs to merge, in order
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Output file name
    #[arg(long, default_value = MERGED_FILE_NAME)]
    pub name: String,
}

#[derive(Args)]
pub struct CompressImageArgs {
    /// Image to compress
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Target size in KB (defaults to the config value)
    #[arg(long)]
    pub target_kb: Option<u32>,

    /// Output format: jpeg, png or webp
    #[arg(long)]
    pub format: Option<ImageFormatChoice>,

    /// Longest allowed side in pixels
    #[arg(long)]
    pub max_dimension: Option<u32>,
}
