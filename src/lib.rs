//! `wsdiff`: colorized character diff for the terminal.
//!
//! Diffs two files byte-by-byte and renders the merged result with ANSI
//! styling: deletions in red strikethrough, insertions in green, changed
//! whitespace highlighted with a background, and changed line breaks shown
//! as a visible `\n` marker. Line numbers and collapsing of unchanged lines
//! are optional.
//!
//! # Architecture
//!
//! ```text
//! loader (mmap) → engine::Diff (similar, Myers) → EditSink::on_edit
//!                                                      ↓
//!                          render::Renderer → OutputBuffer → stdout
//! ```
//!
//! The engine pushes one call per maximal edit run; the renderer consumes
//! each span completely before returning and keeps all of its state in an
//! owned [`Renderer`], so independent diffs never interfere.

pub mod cli;
pub mod engine;
pub mod error;
pub mod loader;
pub mod render;

pub use engine::{Diff, EditSink, EngineOptions, Operation};
pub use error::{DiffError, DiffResult};
pub use render::{RenderOptions, Renderer};
