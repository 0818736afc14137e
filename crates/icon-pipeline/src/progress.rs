//! Windowed progress reporting: a
//! reporter maps a sub-task's 0-100% into a configurable `[start, end]`
//! sub-range of its own 0-100%, so a stage that iterates N screenshots can
//! carve each into `[i/N, (i+1)/N]` without the sub-stage knowing `N`.
//! Nested reporters compose by multiplying their windows.

use icon_collab::ProgressSink;

/// A `[start, end]` sub-range of the parent's 0-100% scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressWindow {
    pub start: f64,
    pub end: f64,
}

impl ProgressWindow {
    pub const FULL: ProgressWindow = ProgressWindow { start: 0.0, end: 100.0 };

    /// Maps a local 0-100 percentage into this window's absolute scale.
    pub fn map(&self, local_pct: f64) -> f64 {
        self.start + (self.end - self.start) * (local_pct.clamp(0.0, 100.0) / 100.0)
    }

    /// Composes a nested `[start, end]` (itself local 0-100) into this
    /// window, producing the absolute sub-window a child reporter uses.
    pub fn nested(&self, local_start: f64, local_end: f64) -> ProgressWindow {
        ProgressWindow { start: self.map(local_start), end: self.map(local_end) }
    }

    /// The `i`-th of `total` evenly sized sub-windows, e.g. for carving a
    /// stage's progress across screenshots.
    pub fn for_item(&self, index: usize, total: usize) -> ProgressWindow {
        if total == 0 {
            return *self;
        }
        let step = 100.0 / total as f64;
        self.nested(index as f64 * step, (index + 1) as f64 * step)
    }
}

/// Reports a named stage's progress through a [`ProgressSink`], scaling
/// every call through `window`.
pub struct ProgressReporter<'a> {
    stage: &'a str,
    sink: &'a dyn ProgressSink,
    window: ProgressWindow,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(stage: &'a str, sink: &'a dyn ProgressSink) -> Self {
        Self { stage, sink, window: ProgressWindow::FULL }
    }

    pub fn with_window(stage: &'a str, sink: &'a dyn ProgressSink, window: ProgressWindow) -> Self {
        Self { stage, sink, window }
    }

    /// Reports `local_pct` (0-100, relative to this reporter's own scale)
    /// under `label`.
    pub fn report(&self, label: &str, local_pct: f64) {
        self.sink.update(self.stage, label, self.window.map(local_pct));
    }

    /// A child reporter scoped to the `[local_start, local_end]` sub-range
    /// of this reporter's window.
    pub fn nested(&self, local_start: f64, local_end: f64) -> ProgressReporter<'a> {
        ProgressReporter { stage: self.stage, sink: self.sink, window: self.window.nested(local_start, local_end) }
    }

    pub fn for_item(&self, index: usize, total: usize) -> ProgressReporter<'a> {
        ProgressReporter { stage: self.stage, sink: self.sink, window: self.window.for_item(index, total) }
    }
}
