//! Whitespace normalization applied before diffing.

use std::borrow::Cow;

use crate::render::classify::{CharClass, classify};

/// Collapse every run of spaces and tabs into a single space.
///
/// Borrows the input when it is already normalized.
pub fn collapse_whitespace(input: &[u8]) -> Cow<'_, [u8]> {
    if is_normalized(input) {
        return Cow::Borrowed(input);
    }

    let mut out = Vec::with_capacity(input.len());
    let mut in_run = false;
    for &byte in input {
        if classify(byte) == CharClass::Whitespace {
            if !in_run {
                out.push(b' ');
            }
            in_run = true;
        } else {
            out.push(byte);
            in_run = false;
        }
    }
    Cow::Owned(out)
}

fn is_normalized(input: &[u8]) -> bool {
    !input.contains(&b'\t') && !input.windows(2).any(|w| w == b"  ")
}
