//! Bounded output accumulator between the renderer and its sink.
//!
//! The renderer emits a few bytes at a time; writing each of those straight
//! to stdout would cost a syscall per byte. Bytes collect here and are
//! handed to the sink once the pending size crosses the flush threshold,
//! and unconditionally when the run finishes.

use std::io::Write;

use tracing::trace;

/// Default threshold: 64 KiB pending output.
const DEFAULT_THRESHOLD: usize = 64 * 1024;

/// Headroom kept below the threshold for the largest single emission
/// (a line prefix plus a newline marker).
const DEFAULT_MARGIN: usize = 256;

/// When a pending [`OutputBuffer`] must be written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
    pub threshold: usize,
    pub margin: usize,
}

impl FlushPolicy {
    /// Pending size above which `maybe_flush` writes out.
    pub const fn limit(&self) -> usize {
        self.threshold.saturating_sub(self.margin)
    }
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Growable byte buffer with explicit flush discipline.
///
/// Bytes are passed to the sink in exactly the order they were written.
#[derive(Debug)]
pub struct OutputBuffer<W: Write> {
    bytes: Vec<u8>,
    policy: FlushPolicy,
    sink: W,
    flushes: usize,
}

impl<W: Write> OutputBuffer<W> {
    pub fn new(sink: W) -> Self {
        Self::with_policy(sink, FlushPolicy::default())
    }

    pub fn with_policy(sink: W, policy: FlushPolicy) -> Self {
        Self {
            bytes: Vec::with_capacity(policy.threshold),
            policy,
            sink,
            flushes: 0,
        }
    }

    /// Append bytes, flushing if the threshold is now exceeded.
    pub fn write(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.bytes.extend_from_slice(bytes);
        self.maybe_flush()
    }

    /// Append a single byte.
    pub fn push(&mut self, byte: u8) -> std::io::Result<()> {
        self.bytes.push(byte);
        self.maybe_flush()
    }

    /// Flush only if pending output exceeds the policy limit.
    pub fn maybe_flush(&mut self) -> std::io::Result<()> {
        if self.bytes.len() > self.policy.limit() {
            self.flush()?;
        }
        Ok(())
    }

    /// Write all pending bytes to the sink and clear.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if !self.bytes.is_empty() {
            trace!(bytes = self.bytes.len(), "flushing output buffer");
            self.sink.write_all(&self.bytes)?;
            self.bytes.clear();
            self.flushes += 1;
        }
        self.sink.flush()
    }

    /// Number of non-empty flushes performed so far.
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Flush and return the sink.
    pub fn into_inner(mut self) -> std::io::Result<W> {
        self.flush()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_policy() -> FlushPolicy {
        FlushPolicy {
            threshold: 8,
            margin: 2,
        }
    }

    #[test]
    fn test_holds_until_threshold() {
        let mut buf = OutputBuffer::with_policy(Vec::new(), small_policy());
        buf.write(b"abcdef").expect("write");
        assert_eq!(buf.bytes, b"abcdef");
        assert!(buf.sink.is_empty());
        assert_eq!(buf.flush_count(), 0);

        buf.push(b'g').expect("push");
        assert!(buf.bytes.is_empty());
        assert_eq!(buf.sink, b"abcdefg");
        assert_eq!(buf.flush_count(), 1);
    }

    #[test]
    fn test_order_preserved_across_flushes() {
        let mut buf = OutputBuffer::with_policy(Vec::new(), small_policy());
        for chunk in [&b"hello "[..], b"wide ", b"world", b"!"] {
            buf.write(chunk).expect("write");
        }
        let out = buf.into_inner().expect("finish");
        assert_eq!(out, b"hello wide world!");
    }

    #[test]
    fn test_empty_flush_is_not_counted() {
        let mut buf = OutputBuffer::new(Vec::new());
        buf.flush().expect("flush");
        assert_eq!(buf.flush_count(), 0);
    }

    #[test]
    fn test_margin_larger_than_threshold() {
        let policy = FlushPolicy {
            threshold: 4,
            margin: 10,
        };
        assert_eq!(policy.limit(), 0);
        let mut buf = OutputBuffer::with_policy(Vec::new(), policy);
        buf.push(b'x').expect("push");
        assert!(buf.bytes.is_empty());
        assert_eq!(buf.sink, b"x");
    }
}
