// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI support for the exporter binary

pub mod progress;
pub mod reporter;

pub use progress::BarProgress;
pub use reporter::Reporter;
