// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ASE exporter CLI

use anyhow::Result;
use ase_export::cli::{BarProgress, Reporter};
use ase_export::{
    build_scene, export_collections, write_ase, ExportConfig, MeshEvalState, MeshSource,
    SceneBuilder, SceneFile, Units,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ase-export")]
#[command(about = "Export mesh scenes to ASCII Scene Export (.ase) files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by the exporting commands
#[derive(Args)]
struct ExportArgs {
    /// Unit preset
    #[arg(long, value_enum)]
    units: Option<Units>,

    /// Explicit scale, overrides --units
    #[arg(long)]
    scale: Option<f64>,

    /// Export mesh data without modifiers applied
    #[arg(long)]
    raw: bool,

    /// Config file (defaults to ase-export.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write vertex colors
    #[arg(long)]
    vertex_colors: bool,
}

impl ExportArgs {
    fn resolve(&self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::from_file(path)?,
            None => ExportConfig::load()?,
        };
        if let Some(units) = self.units {
            config.units = units;
            config.scale = None;
        }
        if let Some(scale) = self.scale {
            config.scale = Some(scale);
        }
        if self.raw {
            config.mesh_data = MeshEvalState::Original;
        }
        if self.vertex_colors {
            config.write_vertex_colors = true;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Export all objects of a scene file to one .ase file
    Export {
        /// Input scene file (JSON)
        input: PathBuf,

        /// Output .ase file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        options: ExportArgs,
    },

    /// Export each visible collection to its own .ase file
    Collections {
        /// Input scene file (JSON)
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        options: ExportArgs,
    },

    /// Print what an export would contain without writing it
    Inspect {
        /// Input scene file (JSON)
        input: PathBuf,

        #[command(flatten)]
        options: ExportArgs,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match &cli.command {
        Commands::Export {
            input,
            output,
            options,
        } => export_command(input, output, options, cli.verbose),
        Commands::Collections {
            input,
            output,
            options,
        } => collections_command(input, output, options, cli.verbose),
        Commands::Inspect { input, options } => inspect_command(input, options),
        Commands::Version => {
            println!("ase-export v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(err) = result {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn export_command(input: &Path, output: &Path, options: &ExportArgs, verbose: bool) -> Result<()> {
    let config = options.resolve()?;
    let start = Instant::now();

    let source = SceneFile::from_file(input)?;
    let records = source.mesh_records(config.mesh_data)?;

    let mut progress = if verbose {
        BarProgress::new("Building")
    } else {
        BarProgress::hidden()
    };
    let scene = SceneBuilder::new(config.to_build_options())
        .with_progress(&mut progress)
        .build(&records)?;
    progress.finish();

    write_ase(&scene, output, &config.writer_options())?;
    Reporter::report_export(output, &scene.summary(), start.elapsed());
    Ok(())
}

fn collections_command(
    input: &Path,
    output: &Path,
    options: &ExportArgs,
    verbose: bool,
) -> Result<()> {
    let config = options.resolve()?;
    let start = Instant::now();
    let source = SceneFile::from_file(input)?;

    if source.visible_collections().next().is_none() {
        Reporter::report_warning("Scene has no visible collections");
        return Ok(());
    }

    let mut progress = if verbose {
        BarProgress::new("Collections")
    } else {
        BarProgress::hidden()
    };
    let written = export_collections(
        &source,
        config.mesh_data,
        &config.to_build_options(),
        &config.writer_options(),
        output,
        &mut progress,
    )?;
    progress.finish();

    Reporter::report_collections(&written, start.elapsed());
    Ok(())
}

fn inspect_command(input: &Path, options: &ExportArgs) -> Result<()> {
    let config = options.resolve()?;
    let source = SceneFile::from_file(input)?;
    let records = source.mesh_records(config.mesh_data)?;

    Reporter::report_info(&format!(
        "{} objects, {} collections, scale {}",
        source.objects.len(),
        source.collections.len(),
        config.unit_scale()
    ));
    let scene = build_scene(&records, &config.to_build_options())?;
    Reporter::report_inspect(&input.display().to_string(), &scene.summary());
    Ok(())
}
