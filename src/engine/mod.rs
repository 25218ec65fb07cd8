//! Diff-engine adapter.
//!
//! Computes a byte-level edit script with the `similar` crate and replays it
//! as a push-style stream of edit runs. Consumers implement [`EditSink`] and
//! receive one call per maximal run, in document order. Within each changed
//! region between two EQUAL runs, the DELETE run comes before the INSERT run.
//!
//! # Pipeline
//!
//! ```text
//! a, b ──► normalize (optional) ──► Myers (deadline) ──► runs
//!      ──► group / merge window ──► EditSink
//! ```

pub mod merge;
pub mod normalize;

use std::borrow::Cow;
use std::ops::Range;
use std::time::{Duration, Instant};

use similar::{Algorithm, DiffTag};
use tracing::{debug, warn};

use crate::error::DiffResult;

/// Default engine deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: f32 = 5.0;

/// Kind of an edit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Equal,
    Delete,
    Insert,
}

/// Receiver of the edit stream.
///
/// `data` is only valid for the duration of the call.
pub trait EditSink {
    fn on_edit(&mut self, op: Operation, data: &[u8]) -> DiffResult<()>;
}

impl<F> EditSink for F
where
    F: FnMut(Operation, &[u8]) -> DiffResult<()>,
{
    fn on_edit(&mut self, op: Operation, data: &[u8]) -> DiffResult<()> {
        self(op, data)
    }
}

/// Options consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Deadline in seconds; zero or negative disables it.
    pub timeout: f32,
    /// Collapse runs of spaces and tabs before diffing.
    pub ignore_whitespace: bool,
    /// Absorb EQUAL runs shorter than this between two edits. Zero is off.
    pub merge_window: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            ignore_whitespace: false,
            merge_window: 0,
        }
    }
}

impl EngineOptions {
    /// Absolute deadline for the diff, or `None` when the timeout is not
    /// positive or too large to represent.
    fn deadline(&self) -> Option<Instant> {
        if self.timeout.is_nan() || self.timeout <= 0.0 {
            return None;
        }
        let deadline = Duration::try_from_secs_f32(self.timeout)
            .ok()
            .and_then(|timeout| Instant::now().checked_add(timeout));
        if deadline.is_none() {
            warn!(timeout = self.timeout, "timeout out of range, diff deadline disabled");
        }
        deadline
    }
}

/// One edit run, as byte ranges into the diffed buffers.
///
/// EQUAL and DELETE runs index the old buffer, INSERT runs the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRun {
    pub op: Operation,
    pub range: Range<usize>,
}

/// A computed diff between two buffers.
///
/// Dropping the handle releases the edit script and any normalized copies
/// of the inputs.
#[derive(Debug)]
pub struct Diff<'a> {
    old: Cow<'a, [u8]>,
    new: Cow<'a, [u8]>,
    runs: Vec<EditRun>,
}

impl<'a> Diff<'a> {
    /// Diff `old` against `new`.
    pub fn new(options: &EngineOptions, old: &'a [u8], new: &'a [u8]) -> Self {
        let (old, new) = if options.ignore_whitespace {
            (
                normalize::collapse_whitespace(old),
                normalize::collapse_whitespace(new),
            )
        } else {
            (Cow::Borrowed(old), Cow::Borrowed(new))
        };

        let deadline = options.deadline();
        let started = Instant::now();
        let ops =
            similar::capture_diff_slices_deadline(Algorithm::Myers, &old[..], &new[..], deadline);
        debug!(
            old_len = old.len(),
            new_len = new.len(),
            ops = ops.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "edit script computed"
        );

        let mut runs = Vec::with_capacity(ops.len());
        for op in &ops {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => push_run(&mut runs, Operation::Equal, old_range),
                DiffTag::Delete => push_run(&mut runs, Operation::Delete, old_range),
                DiffTag::Insert => push_run(&mut runs, Operation::Insert, new_range),
                DiffTag::Replace => {
                    push_run(&mut runs, Operation::Delete, old_range);
                    push_run(&mut runs, Operation::Insert, new_range);
                }
            }
        }

        let runs = merge::coalesce(runs, options.merge_window);

        Self { old, new, runs }
    }

    /// The edit runs in document order.
    pub fn runs(&self) -> &[EditRun] {
        &self.runs
    }

    /// Bytes covered by `run`.
    pub fn span(&self, run: &EditRun) -> &[u8] {
        match run.op {
            Operation::Equal | Operation::Delete => &self.old[run.range.clone()],
            Operation::Insert => &self.new[run.range.clone()],
        }
    }

    /// Feed every run to `sink`, stopping at the first error.
    pub fn for_each_edit(&self, sink: &mut impl EditSink) -> DiffResult<()> {
        for run in &self.runs {
            sink.on_edit(run.op, self.span(run))?;
        }
        Ok(())
    }

    /// `true` if the inputs (after normalization) are identical.
    pub fn is_unchanged(&self) -> bool {
        self.runs.iter().all(|r| r.op == Operation::Equal)
    }
}

/// Append a run, extending the previous one when it is contiguous and of
/// the same kind. Empty ranges are dropped.
pub(crate) fn push_run(runs: &mut Vec<EditRun>, op: Operation, range: Range<usize>) {
    if range.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.op == op && last.range.end == range.start {
            last.range.end = range.end;
            return;
        }
    }
    runs.push(EditRun { op, range });
}
