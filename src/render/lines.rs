//! Line numbering across the merged document.

use crate::render::classify::CharClass;

/// Tracks the line being emitted and whether it has started yet.
///
/// Every line feed advances the count, whether it was equal, deleted, or
/// inserted text, so numbers refer to the rendered document rather than to
/// either input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTracker {
    current_line: usize,
    at_line_start: bool,
}

impl LineTracker {
    pub const fn new() -> Self {
        Self {
            current_line: 1,
            at_line_start: true,
        }
    }

    /// 1-based number of the line the next byte belongs to.
    pub const fn current_line(&self) -> usize {
        self.current_line
    }

    pub const fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Advance past `class` if it is a line feed.
    pub const fn advance_if_newline(&mut self, class: CharClass) {
        if matches!(class, CharClass::Newline) {
            self.advance_line();
        }
    }

    /// Record one consumed line feed.
    pub const fn advance_line(&mut self) {
        self.current_line += 1;
        self.at_line_start = true;
    }

    /// Consume the start-of-line flag.
    ///
    /// Returns the line number the first time it is called on a fresh line
    /// and `None` afterwards, so a prefix is written once per line no matter
    /// how many edit runs contribute to it.
    pub const fn take_line_start(&mut self) -> Option<usize> {
        if self.at_line_start {
            self.at_line_start = false;
            Some(self.current_line)
        } else {
            None
        }
    }
}

impl Default for LineTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Format the `"<line>: "` prefix.
pub fn prefix(line: usize) -> String {
    format!("{line}: ")
}
