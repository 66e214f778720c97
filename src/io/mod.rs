// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - scene files in, ASE documents out

mod command;
pub mod source;
mod tree;
mod writer;

pub use command::{Command, CommandTree, Datum};
pub use source::{CollectionEntry, ObjectEntry, SceneFile};
pub use tree::{build_command_tree, WriterOptions, FORMAT_HEADER, FORMAT_VERSION};
pub use writer::{format_float, render, render_to_string, write_ase};
