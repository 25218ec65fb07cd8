//! Merge-window coalescing of nearby edits.
//!
//! A short EQUAL run sandwiched between two edits is folded into them: its
//! bytes are reported once as deleted and once as inserted, and the
//! surrounding deletions and insertions are joined into a single DELETE run
//! followed by a single INSERT run. This trades precision for fewer, larger
//! highlighted regions.

use tracing::debug;

use super::{EditRun, Operation, push_run};

/// Coalesce `runs` using a window of `window` bytes.
///
/// With a window of zero nothing is absorbed, but each changed region is
/// still regrouped as one DELETE run followed by one INSERT run.
///
/// `runs` must be maximal and in document order, with EQUAL/DELETE ranges
/// indexing the old buffer and INSERT ranges the new one. EQUAL runs at the
/// start or end of the document are never absorbed.
pub fn coalesce(runs: Vec<EditRun>, window: usize) -> Vec<EditRun> {
    let total = runs.len();
    let mut out = Vec::with_capacity(total);
    let mut old_pos = 0usize;
    let mut new_pos = 0usize;
    // Old/new offsets where the open edit region began.
    let mut region: Option<(usize, usize)> = None;
    let mut absorbed = 0usize;

    for (i, run) in runs.into_iter().enumerate() {
        let len = run.range.len();
        match run.op {
            Operation::Equal => {
                let interior = region.is_some() && i + 1 < total;
                if interior && len < window {
                    absorbed += 1;
                } else {
                    close_region(&mut out, region.take(), old_pos, new_pos);
                    push_run(&mut out, Operation::Equal, run.range);
                }
                old_pos += len;
                new_pos += len;
            }
            Operation::Delete => {
                region.get_or_insert((old_pos, new_pos));
                old_pos += len;
            }
            Operation::Insert => {
                region.get_or_insert((old_pos, new_pos));
                new_pos += len;
            }
        }
    }
    close_region(&mut out, region, old_pos, new_pos);

    debug!(window, absorbed, runs = out.len(), "edit regions grouped");
    out
}

fn close_region(
    out: &mut Vec<EditRun>,
    region: Option<(usize, usize)>,
    old_pos: usize,
    new_pos: usize,
) {
    if let Some((old_start, new_start)) = region {
        push_run(out, Operation::Delete, old_start..old_pos);
        push_run(out, Operation::Insert, new_start..new_pos);
    }
}
