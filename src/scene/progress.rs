// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Progress observation

/// Receives a tick after each unit of work
///
/// Observers cannot fail and cannot influence the operation they watch.
pub trait ProgressSink {
    fn tick(&mut self, done: usize, total: usize);
}

/// Sink that ignores every tick
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn tick(&mut self, _done: usize, _total: usize) {}
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, usize),
{
    fn tick(&mut self, done: usize, total: usize) {
        self(done, total)
    }
}
