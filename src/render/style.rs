//! Render modes and the ANSI SGR sequences that enter them.

use crate::engine::Operation;
use crate::render::classify::CharClass;

/// The active styling state of the output stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Unchanged text, no styling.
    #[default]
    Equal,
    DelWs,
    DelOther,
    DelNl,
    InsWs,
    InsOther,
    InsNl,
}

impl RenderMode {
    /// Target mode for a byte of class `class` under operation `op`.
    ///
    /// EQUAL text is never styled, whatever its class.
    pub const fn for_edit(op: Operation, class: CharClass) -> Self {
        match (op, class) {
            (Operation::Equal, _) => Self::Equal,
            (Operation::Delete, CharClass::Whitespace) => Self::DelWs,
            (Operation::Delete, CharClass::Other) => Self::DelOther,
            (Operation::Delete, CharClass::Newline) => Self::DelNl,
            (Operation::Insert, CharClass::Whitespace) => Self::InsWs,
            (Operation::Insert, CharClass::Other) => Self::InsOther,
            (Operation::Insert, CharClass::Newline) => Self::InsNl,
        }
    }

    pub const fn is_newline(self) -> bool {
        matches!(self, Self::DelNl | Self::InsNl)
    }
}

/// Escape sequences emitted on entry to each [`RenderMode`].
///
/// Every non-equal sequence starts with an SGR reset so a direct
/// delete-to-insert switch cannot inherit strikethrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTable {
    pub equal: &'static [u8],
    pub del_ws: &'static [u8],
    pub del_other: &'static [u8],
    pub del_nl: &'static [u8],
    pub ins_ws: &'static [u8],
    pub ins_other: &'static [u8],
    pub ins_nl: &'static [u8],
    /// Visible stand-in for a deleted or inserted line feed.
    pub newline_token: &'static [u8],
}

impl StyleTable {
    /// Red strikethrough for deletions, green for insertions; whitespace
    /// gets a background so it stays visible.
    pub const ANSI: Self = Self {
        equal: b"\x1b[0m",
        del_ws: b"\x1b[0;9;41m",
        del_other: b"\x1b[0;9;31m",
        del_nl: b"\x1b[0;1;41m",
        ins_ws: b"\x1b[0;42m",
        ins_other: b"\x1b[0;32m",
        ins_nl: b"\x1b[0;1;42m",
        newline_token: b"\\n",
    };

    pub const fn sequence(&self, mode: RenderMode) -> &'static [u8] {
        match mode {
            RenderMode::Equal => self.equal,
            RenderMode::DelWs => self.del_ws,
            RenderMode::DelOther => self.del_other,
            RenderMode::DelNl => self.del_nl,
            RenderMode::InsWs => self.ins_ws,
            RenderMode::InsOther => self.ins_other,
            RenderMode::InsNl => self.ins_nl,
        }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::ANSI
    }
}
