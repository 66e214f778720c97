// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export configuration

use crate::geometry::{MaterialId, MeshEvalState};
use crate::io::WriterOptions;
use crate::scene::{BuildOptions, METERS_UNIT_SCALE, UNREAL_UNIT_SCALE};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default config file looked up by [`ExportConfig::load`]
pub const CONFIG_FILE: &str = "ase-export.toml";

/// Unit presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Meters,
    #[default]
    Unreal,
}

impl Units {
    pub fn scale(self) -> f64 {
        match self {
            Units::Meters => METERS_UNIT_SCALE,
            Units::Unreal => UNREAL_UNIT_SCALE,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Meters => f.write_str("meters"),
            Units::Unreal => f.write_str("unreal"),
        }
    }
}

impl FromStr for Units {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meters" | "m" => Ok(Units::Meters),
            "unreal" | "uu" => Ok(Units::Unreal),
            other => bail!("Unknown units '{}', expected 'meters' or 'unreal'", other),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub units: Units,
    /// Overrides the preset scale of `units`
    pub scale: Option<f64>,
    /// Which mesh data to export
    pub mesh_data: MeshEvalState,
    /// Material order for the material list
    pub materials: Vec<String>,
    pub write_vertex_colors: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            units: Units::Unreal,
            scale: None,
            mesh_data: MeshEvalState::Evaluated,
            materials: Vec::new(),
            write_vertex_colors: false,
        }
    }
}

impl ExportConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ExportConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `ASE_EXPORT_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(units) = lookup("ASE_EXPORT_UNITS") {
            self.units = units.parse()?;
            // Units replace any scale from the file, as `--units` does
            self.scale = None;
        }

        if let Some(scale) = lookup("ASE_EXPORT_SCALE") {
            let scale: f64 = scale
                .trim()
                .parse()
                .with_context(|| format!("Invalid ASE_EXPORT_SCALE: {}", scale))?;
            self.scale = Some(scale);
        }

        if let Some(mesh_data) = lookup("ASE_EXPORT_MESH_DATA") {
            self.mesh_data = match mesh_data.trim().to_ascii_lowercase().as_str() {
                "original" | "raw" => MeshEvalState::Original,
                "evaluated" => MeshEvalState::Evaluated,
                other => bail!("Invalid ASE_EXPORT_MESH_DATA: {}", other),
            };
        }

        if let Some(colors) = lookup("ASE_EXPORT_VERTEX_COLORS") {
            self.write_vertex_colors = colors
                .trim()
                .parse()
                .with_context(|| format!("Invalid ASE_EXPORT_VERTEX_COLORS: {}", colors))?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn unit_scale(&self) -> f64 {
        self.scale.unwrap_or_else(|| self.units.scale())
    }

    pub fn to_build_options(&self) -> BuildOptions {
        BuildOptions::default()
            .with_unit_scale(self.unit_scale())
            .with_materials(self.materials.iter().map(|m| MaterialId::from(m.as_str())))
    }

    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions::default().with_vertex_colors(self.write_vertex_colors)
    }
}
