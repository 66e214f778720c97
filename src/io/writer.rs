// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ASE text writer
//!
//! Line grammar: `*NAME` followed by ` datum` items, then ` *NAME datum...` for
//! each inline command. A command with children opens ` {`, writes them one
//! tab deeper and closes with `}` at its own depth.

use super::command::{Command, CommandTree, Datum};
use super::tree::{build_command_tree, WriterOptions};
use crate::scene::Scene;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Fixed-point rendering with four decimals
///
/// Small negatives keep their sign, so `-0.00004` renders as `-0.0000`.
pub fn format_float(value: f64) -> String {
    format!("{:.4}", value)
}

/// Serialize a tree to any byte sink
pub fn render<W: Write>(tree: &CommandTree, out: &mut W) -> io::Result<()> {
    for command in &tree.commands {
        write_command(out, command, 0)?;
    }
    Ok(())
}

pub fn render_to_string(tree: &CommandTree) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail and every token is ASCII or UTF-8 input
    let _ = render(tree, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Build, render and atomically write a scene to `path`
///
/// The document is rendered in memory first and moved into place only once
/// complete, so a failure leaves any existing file untouched.
pub fn write_ase(scene: &Scene, path: impl AsRef<Path>, options: &WriterOptions) -> Result<()> {
    let path = path.as_ref();
    let tree = build_command_tree(scene, options);

    let mut buffer = Vec::new();
    render(&tree, &mut buffer).context("Failed to render ASE document")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(&buffer)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Failed to move ASE file into place at {}", path.display()))?;

    info!(
        "Wrote {} ({} bytes, {} geometry objects)",
        path.display(),
        buffer.len(),
        scene.geometry_groups.len()
    );
    Ok(())
}

fn write_command<W: Write>(out: &mut W, command: &Command, depth: usize) -> io::Result<()> {
    write_indent(out, depth)?;
    write_head(out, command)?;
    for inline in &command.inline {
        write!(out, " ")?;
        write_head(out, inline)?;
    }

    if command.children.is_empty() {
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, " {{")?;
    for child in &command.children {
        write_command(out, child, depth + 1)?;
    }
    write_indent(out, depth)?;
    writeln!(out, "}}")
}

fn write_head<W: Write>(out: &mut W, command: &Command) -> io::Result<()> {
    write!(out, "*{}", command.name)?;
    for datum in &command.data {
        write!(out, " ")?;
        write_datum(out, datum)?;
    }
    Ok(())
}

fn write_datum<W: Write>(out: &mut W, datum: &Datum) -> io::Result<()> {
    match datum {
        Datum::Str(s) => write!(out, "\"{}\"", s),
        Datum::Int(i) => write!(out, "{}", i),
        Datum::Float(f) => write!(out, "{}", format_float(*f)),
        Datum::Map(entries) => {
            for (index, (key, value)) in entries.iter().enumerate() {
                if index > 0 {
                    write!(out, " ")?;
                }
                write!(out, "{}: ", key)?;
                write_datum(out, value)?;
            }
            Ok(())
        }
    }
}

fn write_indent<W: Write>(out: &mut W, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        out.write_all(b"\t")?;
    }
    Ok(())
}
