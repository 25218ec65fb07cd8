//! Streaming renderer for edit runs.
//!
//! Consumes the edit stream one run at a time and writes an ANSI-colored
//! rendition of the merged document:
//!
//! - EQUAL text is written as-is, unstyled.
//! - DELETE and INSERT text is split into whitespace / other / newline
//!   segments, each styled from the [`StyleTable`]. A changed line feed is
//!   shown as a visible `\n` marker followed by a real line break.
//! - Optional `"<n>: "` prefixes number the lines of the merged document.
//! - Optionally, lines made entirely of EQUAL text are dropped.
//!
//! A style sequence is written only when the target mode differs from the
//! mode currently in effect, so a run of same-class bytes costs one escape.

pub mod buffer;
pub mod classify;
pub mod lines;
pub mod style;

use std::io::Write;

use tracing::{debug, trace};

use crate::engine::{EditSink, EngineOptions, Operation};
use crate::error::DiffResult;

use buffer::{FlushPolicy, OutputBuffer};
use classify::{CharClass, CrPolicy, classify_with};
use lines::LineTracker;
use style::{RenderMode, StyleTable};

/// Options fixed for the duration of one render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// The engine normalized whitespace before diffing.
    pub ignore_whitespace: bool,
    /// Drop lines whose content is entirely EQUAL.
    pub skip_equal_lines: bool,
    /// Prefix each rendered line with its number.
    pub show_line_numbers: bool,
    /// Merge window the engine was run with.
    pub merge_window: usize,
    /// Classification of `\r`.
    pub cr_policy: CrPolicy,
}

impl RenderOptions {
    /// Engine options matching these render options.
    pub const fn engine_options(&self, timeout: f32) -> EngineOptions {
        EngineOptions {
            timeout,
            ignore_whitespace: self.ignore_whitespace,
            merge_window: self.merge_window,
        }
    }
}

/// Line position and active mode of a render in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    pub lines: LineTracker,
    pub mode: RenderMode,
}

/// Counters reported when a render finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub runs: usize,
    pub transitions: usize,
    pub skipped_lines: usize,
}

/// Renders one diff run into `W`.
///
/// A renderer is single-use: build one per diff and call [`finish`] at the
/// end to reset styling and flush.
///
/// [`finish`]: Renderer::finish
#[derive(Debug)]
pub struct Renderer<W: Write> {
    out: OutputBuffer<W>,
    state: RenderState,
    options: RenderOptions,
    styles: StyleTable,
    stats: RenderStats,
}

impl<W: Write> Renderer<W> {
    pub fn new(sink: W, options: RenderOptions) -> Self {
        Self::with_policy(sink, options, FlushPolicy::default())
    }

    pub fn with_policy(sink: W, options: RenderOptions, policy: FlushPolicy) -> Self {
        Self {
            out: OutputBuffer::with_policy(sink, policy),
            state: RenderState::default(),
            options,
            styles: StyleTable::ANSI,
            stats: RenderStats::default(),
        }
    }

    pub const fn state(&self) -> RenderState {
        self.state
    }

    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Render one edit run. The whole span is consumed before returning.
    pub fn render(&mut self, op: Operation, data: &[u8]) -> DiffResult<()> {
        debug!(
            op = ?op,
            len = data.len(),
            line = self.state.lines.current_line(),
            "edit run"
        );
        self.stats.runs += 1;
        match op {
            Operation::Equal => self.render_equal(data)?,
            Operation::Delete | Operation::Insert => self.render_change(op, data)?,
        }
        Ok(())
    }

    /// Reset styling, flush everything, and hand back the sink.
    pub fn finish(mut self) -> DiffResult<W> {
        self.enter(RenderMode::Equal)?;
        debug!(
            runs = self.stats.runs,
            transitions = self.stats.transitions,
            skipped_lines = self.stats.skipped_lines,
            flushes = self.out.flush_count(),
            "render finished"
        );
        Ok(self.out.into_inner()?)
    }

    fn render_equal(&mut self, data: &[u8]) -> std::io::Result<()> {
        let mut rest = data;
        while !rest.is_empty() {
            let newline = rest.iter().position(|&b| b == b'\n');

            if self.options.skip_equal_lines && self.state.lines.at_line_start() {
                if let Some(pos) = newline {
                    self.state.lines.advance_line();
                    self.stats.skipped_lines += 1;
                    rest = &rest[pos + 1..];
                    continue;
                }
            }

            let end = newline.map_or(rest.len(), |pos| pos + 1);
            let (line, tail) = rest.split_at(end);
            self.begin_line()?;
            self.enter(RenderMode::Equal)?;
            self.out.write(line)?;
            if let Some(&last) = line.last() {
                self.state
                    .lines
                    .advance_if_newline(classify_with(last, self.options.cr_policy));
            }
            rest = tail;
        }
        Ok(())
    }

    fn render_change(&mut self, op: Operation, data: &[u8]) -> std::io::Result<()> {
        let cr = self.options.cr_policy;
        let mut start = 0;
        while start < data.len() {
            let class = classify_with(data[start], cr);
            let end = data[start..]
                .iter()
                .position(|&b| classify_with(b, cr) != class)
                .map_or(data.len(), |len| start + len);
            let mode = RenderMode::for_edit(op, class);

            if class == CharClass::Newline {
                for _ in start..end {
                    self.changed_newline(mode)?;
                }
            } else {
                // Whitespace and other segments never cross a line feed.
                self.begin_line()?;
                self.enter(mode)?;
                self.out.write(&data[start..end])?;
            }
            start = end;
        }
        Ok(())
    }

    /// Visible marker, reset, then the real line break.
    fn changed_newline(&mut self, mode: RenderMode) -> std::io::Result<()> {
        debug_assert!(mode.is_newline());
        self.begin_line()?;
        self.enter(mode)?;
        self.out.write(self.styles.newline_token)?;
        self.enter(RenderMode::Equal)?;
        self.out.push(b'\n')?;
        self.state.lines.advance_line();
        Ok(())
    }

    /// Write the line prefix if this is the first byte of a line.
    ///
    /// The prefix is always written unstyled.
    fn begin_line(&mut self) -> std::io::Result<()> {
        if let Some(line) = self.state.lines.take_line_start() {
            if self.options.show_line_numbers {
                self.enter(RenderMode::Equal)?;
                self.out.write(lines::prefix(line).as_bytes())?;
            }
        }
        Ok(())
    }

    fn enter(&mut self, mode: RenderMode) -> std::io::Result<()> {
        if mode != self.state.mode {
            trace!(from = ?self.state.mode, to = ?mode, "style transition");
            self.out.write(self.styles.sequence(mode))?;
            self.state.mode = mode;
            self.stats.transitions += 1;
        }
        Ok(())
    }
}

impl<W: Write> EditSink for Renderer<W> {
    fn on_edit(&mut self, op: Operation, data: &[u8]) -> DiffResult<()> {
        self.render(op, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESET: &str = "\x1b[0m";
    const DEL: &str = "\x1b[0;9;31m";
    const DEL_WS: &str = "\x1b[0;9;41m";
    const DEL_NL: &str = "\x1b[0;1;41m";
    const INS: &str = "\x1b[0;32m";
    const INS_NL: &str = "\x1b[0;1;42m";

    fn render(options: RenderOptions, events: &[(Operation, &str)]) -> String {
        let mut renderer = Renderer::new(Vec::new(), options);
        for (op, data) in events {
            renderer.render(*op, data.as_bytes()).expect("render");
        }
        let out = renderer.finish().expect("finish");
        String::from_utf8(out).expect("utf-8 output")
    }

    fn numbered() -> RenderOptions {
        RenderOptions {
            show_line_numbers: true,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_empty_stream_emits_nothing() {
        assert_eq!(render(RenderOptions::default(), &[]), "");
    }

    #[test]
    fn test_equal_is_verbatim() {
        let out = render(RenderOptions::default(), &[(Operation::Equal, "a b\n\tc")]);
        assert_eq!(out, "a b\n\tc");
    }

    #[test]
    fn test_equal_run_ending_in_newline_starts_next_line() {
        let mut renderer = Renderer::new(Vec::new(), numbered());
        renderer.render(Operation::Equal, b"a\r\n").expect("render");
        assert_eq!(renderer.state().lines.current_line(), 2);
        assert!(renderer.state().lines.at_line_start());
        renderer.render(Operation::Equal, b"b").expect("render");
        assert_eq!(renderer.state().lines.current_line(), 2);
        assert!(!renderer.state().lines.at_line_start());
        let out = renderer.finish().expect("finish");
        assert_eq!(out, b"1: a\r\n2: b");
    }

    #[test]
    fn test_delete_segments_by_class() {
        let out = render(RenderOptions::default(), &[(Operation::Delete, "ab  cd")]);
        assert_eq!(out, format!("{DEL}ab{DEL_WS}  {DEL}cd{RESET}"));
    }

    #[test]
    fn test_whitespace_run_is_one_transition() {
        let mut renderer = Renderer::new(Vec::new(), RenderOptions::default());
        renderer.render(Operation::Delete, b"   ").expect("render");
        assert_eq!(renderer.stats().transitions, 1);
        renderer.render(Operation::Equal, b"x").expect("render");
        assert_eq!(renderer.stats().transitions, 2);
        let out = renderer.finish().expect("finish");
        assert_eq!(out, format!("{DEL_WS}   {RESET}x").into_bytes());
    }

    #[test]
    fn test_changed_newline_marker() {
        let out = render(RenderOptions::default(), &[(Operation::Insert, "\n\n")]);
        assert_eq!(out, format!("{INS_NL}\\n{RESET}\n{INS_NL}\\n{RESET}\n"));
    }

    #[test]
    fn test_insert_newline_first_sets_line_start() {
        let mut renderer = Renderer::new(Vec::new(), numbered());
        renderer.render(Operation::Equal, b"ab").expect("render");
        renderer.render(Operation::Insert, b"\nx").expect("render");
        let state = renderer.state();
        assert_eq!(state.lines.current_line(), 2);
        assert!(!state.lines.at_line_start());

        renderer.render(Operation::Insert, b"\n").expect("render");
        assert!(renderer.state().lines.at_line_start());
        renderer.render(Operation::Equal, b"y").expect("render");
        let out = String::from_utf8(renderer.finish().expect("finish")).expect("utf-8");
        assert_eq!(
            out,
            format!("1: ab{INS_NL}\\n{RESET}\n2: {INS}x{INS_NL}\\n{RESET}\n3: y")
        );
    }

    #[test]
    fn test_prefix_is_unstyled_after_deletion() {
        let out = render(
            numbered(),
            &[(Operation::Delete, "gone\nalso"), (Operation::Equal, " kept\n")],
        );
        assert_eq!(
            out,
            format!("1: {DEL}gone{DEL_NL}\\n{RESET}\n2: {DEL}also{RESET} kept\n")
        );
    }

    #[test]
    fn test_prefix_once_per_line_across_runs() {
        let out = render(
            numbered(),
            &[
                (Operation::Equal, "a"),
                (Operation::Delete, "b"),
                (Operation::Insert, "c"),
                (Operation::Equal, "d\ne"),
            ],
        );
        assert_eq!(out, format!("1: a{DEL}b{INS}c{RESET}d\n2: e"));
    }

    #[test]
    fn test_skip_equal_lines() {
        let options = RenderOptions {
            skip_equal_lines: true,
            show_line_numbers: true,
            ..RenderOptions::default()
        };
        let mut renderer = Renderer::new(Vec::new(), options);
        renderer.render(Operation::Equal, b"line1\nline2\nline3").expect("render");
        assert_eq!(renderer.stats().skipped_lines, 2);
        let out = renderer.finish().expect("finish");
        assert_eq!(out, b"3: line3");
    }

    #[test]
    fn test_skip_keeps_tail_of_changed_line() {
        let options = RenderOptions {
            skip_equal_lines: true,
            ..RenderOptions::default()
        };
        let out = render(
            options,
            &[
                (Operation::Delete, "x"),
                (Operation::Equal, "tail\nsame\nhead "),
                (Operation::Insert, "y"),
            ],
        );
        assert_eq!(out, format!("{DEL}x{RESET}tail\nhead {INS}y{RESET}"));
    }

    #[test]
    fn test_cr_policy_whitespace() {
        let options = RenderOptions {
            cr_policy: CrPolicy::Whitespace,
            ..RenderOptions::default()
        };
        let out = render(options, &[(Operation::Delete, "a\r")]);
        assert_eq!(out, format!("{DEL}a{DEL_WS}\r{RESET}"));

        let out = render(RenderOptions::default(), &[(Operation::Delete, "a\r")]);
        assert_eq!(out, format!("{DEL}a\r{RESET}"));
    }

    #[test]
    fn test_small_buffer_output_matches() {
        let events = [
            (Operation::Equal, "foo "),
            (Operation::Delete, "bar"),
            (Operation::Insert, "baz"),
            (Operation::Equal, "\n"),
        ];
        let policy = FlushPolicy {
            threshold: 4,
            margin: 1,
        };
        let mut renderer = Renderer::with_policy(Vec::new(), numbered(), policy);
        for (op, data) in &events {
            renderer.render(*op, data.as_bytes()).expect("render");
        }
        let small = renderer.finish().expect("finish");
        assert_eq!(String::from_utf8(small).expect("utf-8"), render(numbered(), &events));
    }
}
