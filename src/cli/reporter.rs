// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::scene::{GroupSummary, SceneSummary};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished single-file export
    pub fn report_export(path: &Path, summary: &SceneSummary, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Exported:".bold(), path.display().to_string().cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_summary(summary);
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report the files written by a collection export
    pub fn report_collections(paths: &[PathBuf], duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!(
            "{} {} {}",
            "Exported".bold(),
            paths.len().to_string().cyan(),
            "collections".bold()
        );
        println!("{}", "━".repeat(80).bright_black());
        for path in paths {
            println!("  {} {}", "→".bright_black(), path.display());
        }
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report a scene summary without writing anything
    pub fn report_inspect(source: &str, summary: &SceneSummary) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Scene:".bold(), source.cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_summary(summary);
        println!("{}", "━".repeat(80).bright_black());
    }

    fn print_summary(summary: &SceneSummary) {
        println!("{}", "Materials:".bold());
        if summary.materials.is_empty() {
            println!("  {}", "(none)".bright_black());
        }
        for (index, name) in summary.materials.iter().enumerate() {
            println!("  {} {}", format!("{}:", index).bright_black(), name);
        }

        println!("{}", "Geometry:".bold());
        for group in &summary.groups {
            Self::print_group(group);
        }
    }

    fn print_group(group: &GroupSummary) {
        let kind = if group.class.is_collision() {
            "collision".yellow()
        } else {
            "renderable".green()
        };
        let name = if group.name.is_empty() {
            "(merged)".to_string()
        } else {
            group.name.clone()
        };
        println!(
            "  {} [{}] {} {} {} {} {} {}",
            name.cyan(),
            kind,
            "vertices:".bright_black(),
            group.vertex_count,
            "faces:".bright_black(),
            group.face_count,
            "uv channels:".bright_black(),
            group.uv_channels
        );
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
