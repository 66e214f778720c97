// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Command tree - format-agnostic intermediate representation
//!
//! A document is a list of commands. Each command has a name, a list of data
//! items, inline commands written on the same line, and child commands written
//! as an indented block.

use serde::Serialize;

/// One data item of a command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Datum {
    Str(String),
    Int(i64),
    Float(f64),
    /// Ordered `key: value` pairs
    Map(Vec<(String, Datum)>),
}

impl Datum {
    /// Build a map datum from `(key, value)` pairs
    pub fn map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Datum>,
    {
        Datum::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Str(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::Str(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Int(value)
    }
}

impl From<u32> for Datum {
    fn from(value: u32) -> Self {
        Datum::Int(value as i64)
    }
}

impl From<usize> for Datum {
    fn from(value: usize) -> Self {
        Datum::Int(value as i64)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Float(value)
    }
}

/// Node of the command tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub name: String,
    pub data: Vec<Datum>,
    /// Written on the parent's line as ` *NAME data...`
    pub inline: Vec<Command>,
    /// Written as an indented block
    pub children: Vec<Command>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
            inline: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn datum(mut self, datum: impl Into<Datum>) -> Self {
        self.data.push(datum.into());
        self
    }

    pub fn data<I, D>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Datum>,
    {
        self.data.extend(data.into_iter().map(Into::into));
        self
    }

    pub fn with_inline(mut self, command: Command) -> Self {
        self.inline.push(command);
        self
    }

    pub fn with_child(mut self, command: Command) -> Self {
        self.children.push(command);
        self
    }

    /// Append a finished child
    pub fn push(&mut self, command: Command) {
        self.children.push(command);
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Command> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// A whole document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandTree {
    pub commands: Vec<Command>,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn commands_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Command> + 'a {
        self.commands.iter().filter(move |c| c.name == name)
    }
}
