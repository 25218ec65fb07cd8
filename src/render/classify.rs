//! Byte classification for segmenting edit spans.

/// Character class of a single input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Any byte that is not whitespace or a line feed.
    Other,
    /// Space or tab.
    Whitespace,
    /// Line feed.
    Newline,
}

/// How a carriage return is classified.
///
/// A carriage return is never a line break; line numbering counts `\n` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrPolicy {
    /// `\r` is ordinary content.
    #[default]
    Content,
    /// `\r` is styled like spaces and tabs.
    Whitespace,
}

/// Classify one byte under the default carriage-return policy.
pub const fn classify(byte: u8) -> CharClass {
    classify_with(byte, CrPolicy::Content)
}

/// Classify one byte under an explicit carriage-return policy.
pub const fn classify_with(byte: u8, cr: CrPolicy) -> CharClass {
    match byte {
        b'\n' => CharClass::Newline,
        b' ' | b'\t' => CharClass::Whitespace,
        b'\r' if matches!(cr, CrPolicy::Whitespace) => CharClass::Whitespace,
        _ => CharClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newline_only_for_line_feed() {
        assert_eq!(classify(b'\n'), CharClass::Newline);
        assert_eq!(classify(b'\r'), CharClass::Other);
        assert_eq!(classify(0x0b), CharClass::Other); // vertical tab
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(classify(b' '), CharClass::Whitespace);
        assert_eq!(classify(b'\t'), CharClass::Whitespace);
    }

    #[test]
    fn test_other_is_total() {
        let others = (0u8..=255)
            .filter(|&b| classify(b) == CharClass::Other)
            .count();
        // Everything but LF, space, and tab.
        assert_eq!(others, 253);
    }

    #[test]
    fn test_cr_policy() {
        assert_eq!(classify_with(b'\r', CrPolicy::Whitespace), CharClass::Whitespace);
        assert_eq!(classify_with(b'\r', CrPolicy::Content), CharClass::Other);
        assert_eq!(classify_with(b'\n', CrPolicy::Whitespace), CharClass::Newline);
    }
}
