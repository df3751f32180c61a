// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blattwerk — offline PDF split/merge with header/footer stamping and image
// compression.
//
// Entry point. Initialises logging, loads the config, and dispatches the
// chosen command to the service layer.

mod cli;
mod services;

use anyhow::{Context, Result};
use blattwerk_core::SplitPlan;
use blattwerk_core::error::BlattwerkError;
use blattwerk_core::human_errors::humanize_error;
use clap::Parser;

use cli::{Cli, Commands};
use services::data_dir;
use services::toolkit::{self, CompressJob, SplitJob, ToolkitServices};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Blattwerk starting");

    if let Err(err) = run(cli) {
        tracing::error!(error = %format!("{err:#}"), "Command failed");
        match err.downcast_ref::<BlattwerkError>() {
            Some(blattwerk_err) => {
                let human = humanize_error(blattwerk_err);
                eprintln!("{}", human.message);
                eprintln!("  {}", human.suggestion);
            }
            None => eprintln!("{err:#}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(data_dir::default_config_path);
    let svc = ToolkitServices::init(&config_path, cli.output);

    match cli.command {
        Commands::Plan(args) => {
            let plan = svc.plan(args.pages, args.mode, &args.spec);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
        }
        Commands::Split(args) => {
            let report = svc.split(&SplitJob {
                input: args.input,
                mode: args.mode,
                specification: args.spec,
                header: args.header,
                footer: args.footer,
                skip_header_footer: args.no_header_footer,
                write_manifest: args.manifest,
            })?;
            print_plan(&report.plan);
            for path in &report.outputs {
                println!("wrote {}", path.display());
            }
            if let Some(manifest) = &report.manifest {
                println!("manifest {}", manifest.display());
            }
        }
        Commands::Merge(args) => {
            let report = svc.merge(&args.inputs, &args.name)?;
            for name in &report.outcome.skipped {
                println!("skipped {name} (not a readable PDF)");
            }
            println!(
                "wrote {} ({} pages from {} files)",
                report.output.display(),
                report.outcome.page_count,
                report.outcome.merged.len()
            );
            if let Some(manifest) = &report.manifest {
                println!("manifest {}", manifest.display());
            }
        }
        Commands::CompressImage(args) => {
            let report = svc.compress_image(&CompressJob {
                input: args.input,
                target_kb: args.target_kb,
                format: args.format,
                max_dimension: args.max_dimension,
            })?;
            println!(
                "wrote {} ({}x{}, {:.1} KB, was {:.1} KB)",
                report.output.display(),
                report.image.width,
                report.image.height,
                report.image.size_kb(),
                report.original_size as f64 / 1024.0
            );
        }
        Commands::InitConfig => {
            toolkit::persist_config(&config_path, svc.config())
                .with_context(|| format!("writing {}", config_path.display()))?;
            println!("wrote {}", config_path.display());
        }
    }

    tracing::debug!(output = %svc.output_dir().display(), "Done");
    Ok(())
}

fn print_plan(plan: &SplitPlan) {
    println!(
        "{} pages, mode {}, boundaries {:?}",
        plan.page_count,
        plan.mode,
        plan.boundaries.as_slice()
    );
    for (position, segment) in plan.segments.iter().enumerate() {
        println!(
            "  part {}: pages {}-{}",
            position + 1,
            segment.start + 1,
            segment.end
        );
    }
}
