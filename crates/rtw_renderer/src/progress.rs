//! Progress reporting for a running render.
//!
//! Reporting is one-way: workers bump [`RenderCounters::rows_completed`] and a
//! separate poll loop reads it at a fixed interval. Dispatch never waits on
//! the reporter.

use std::fmt::Display;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::RenderCounters;

/// Snapshot of the rows-completed counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub rows_completed: u32,
    pub total_rows: u32,
}

impl Progress {
    pub fn fraction(&self) -> f32 {
        if self.total_rows == 0 {
            return 1.0;
        }
        (self.rows_completed as f32 / self.total_rows as f32).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.rows_completed >= self.total_rows
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        PercentBar {
            percent: self.fraction(),
            width: 50,
        }
        .fmt(f)?;
        write!(f, " ({}/{} rows)", self.rows_completed, self.total_rows)
    }
}

pub struct PercentBar {
    pub percent: f32,
    pub width: usize,
}

impl Display for PercentBar {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.width.max(1);
        let filled = ((width - 1) as f32 * self.percent).round() as usize;
        write!(
            f,
            "[{empty:=>width_left$}>{empty:.<width_right$}] {percent:.1}%",
            empty = "",
            width_left = filled,
            width_right = width - 1 - filled,
            percent = 100. * self.percent
        )
    }
}

/// Receives progress snapshots from the poll loop.
pub trait ProgressSink: Send {
    fn report(&mut self, progress: Progress);
}

impl<F: FnMut(Progress) + Send> ProgressSink for F {
    fn report(&mut self, progress: Progress) {
        self(progress)
    }
}

/// Prints a single updating bar line to stderr.
#[derive(Debug, Default)]
pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn report(&mut self, progress: Progress) {
        let mut stderr = std::io::stderr().lock();
        let _ = if progress.is_complete() {
            writeln!(stderr, "\r{progress}")
        } else {
            write!(stderr, "\r{progress}")
        };
        let _ = stderr.flush();
    }
}

/// Poll `counters` every `interval` until all rows are done or `stop` is set.
///
/// A complete snapshot is always the last one reported when the render
/// finished normally.
pub fn poll_until_complete(
    counters: &RenderCounters,
    total_rows: u32,
    interval: Duration,
    stop: &AtomicBool,
    sink: &mut dyn ProgressSink,
) {
    let snapshot = || Progress {
        rows_completed: counters.rows_completed(),
        total_rows,
    };

    loop {
        let progress = snapshot();
        if progress.is_complete() {
            sink.report(progress);
            return;
        }
        if stop.load(Ordering::Acquire) {
            // Dispatch may have finished between the read above and the flag.
            sink.report(snapshot());
            return;
        }
        sink.report(progress);
        std::thread::sleep(interval);
    }
}
