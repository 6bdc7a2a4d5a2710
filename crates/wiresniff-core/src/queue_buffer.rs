//! Per-flow byte accumulator that absorbs TCP segmentation.
//!
//! Backed by a growable deque: bytes are appended at the tail, consumed
//! bytes are dropped from the head, and the deque's own ring storage handles
//! capacity growth. This is the "growable deque" option the data model
//! description allows alongside a ring-with-copy-on-wrap or a linear buffer
//! with compaction — `peek` materializes a short contiguous copy since a
//! deque's internal storage can itself wrap.

use std::collections::VecDeque;

/// Default maximum capacity, matching the capture driver's scratch buffer
/// size. A buffer that fills up is a protocol desync or a leak, not
/// something this type tries to paper over.
pub const DEFAULT_MAX_CAPACITY: usize = 1024 * 1024;

/// A bounded FIFO byte queue for one flow.
#[derive(Debug)]
pub struct QueueBuffer {
    data: VecDeque<u8>,
    max_capacity: usize,
}

/// The buffer has no room left for an incoming chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("queue buffer is full: {len} bytes buffered, {incoming} incoming, max {max}")]
pub struct BufferFull {
    /// Bytes already buffered.
    pub len: usize,
    /// Bytes that were about to be pushed.
    pub incoming: usize,
    /// Configured maximum capacity.
    pub max: usize,
}

impl QueueBuffer {
    /// Create an empty buffer bounded by [`DEFAULT_MAX_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Create an empty buffer bounded by `max_capacity`.
    #[must_use]
    pub fn with_max_capacity(max_capacity: usize) -> Self {
        Self { data: VecDeque::new(), max_capacity }
    }

    /// Number of bytes currently buffered.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append `bytes` to the tail of the queue.
    ///
    /// # Errors
    ///
    /// Returns [`BufferFull`] if appending would exceed the configured
    /// maximum capacity. A full buffer means a connection is sending data
    /// faster than it's being reassembled into frames, which on this
    /// protocol means something upstream is stuck — not a condition to
    /// quietly truncate around.
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), BufferFull> {
        if self.data.len() + bytes.len() > self.max_capacity {
            return Err(BufferFull {
                len: self.data.len(),
                incoming: bytes.len(),
                max: self.max_capacity,
            });
        }
        self.data.extend(bytes.iter().copied());
        Ok(())
    }

    /// Return the next `n` bytes without consuming them, as a contiguous
    /// `Vec`. Returns `None` if fewer than `n` bytes are buffered.
    ///
    /// Trial frame-header inspection needs a contiguous view; a `VecDeque`
    /// can be split across its ring internally; here we materialize a copy.
    /// The copy is small (the inspection is always a fixed-size header, a
    /// few tens of bytes) so this trades a cheap allocation for never
    /// needing a second, wraparound-aware access path.
    #[must_use]
    pub fn peek(&self, n: usize) -> Option<Vec<u8>> {
        if self.data.len() < n {
            return None;
        }
        Some(self.data.iter().take(n).copied().collect())
    }

    /// Remove and return the next `n` bytes. Returns `None` (and leaves the
    /// buffer untouched) if fewer than `n` bytes are buffered.
    pub fn pop(&mut self, n: usize) -> Option<Vec<u8>> {
        if self.data.len() < n {
            return None;
        }
        Some(self.data.drain(..n).collect())
    }
}

impl Default for QueueBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn push_then_pop_round_trips() {
        let mut buf = QueueBuffer::new();
        buf.push(b"hello ").unwrap();
        buf.push(b"world").unwrap();
        assert_eq!(buf.size(), 11);
        assert_eq!(buf.peek(5).unwrap(), b"hello");
        assert_eq!(buf.pop(11).unwrap(), b"hello world");
        assert!(buf.is_empty());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut buf = QueueBuffer::new();
        buf.push(b"abcdef").unwrap();
        assert_eq!(buf.peek(3).unwrap(), b"abc");
        assert_eq!(buf.size(), 6);
        assert_eq!(buf.pop(3).unwrap(), b"abc");
        assert_eq!(buf.peek(3).unwrap(), b"def");
    }

    #[test]
    fn short_peek_and_pop_return_none() {
        let mut buf = QueueBuffer::new();
        buf.push(b"ab").unwrap();
        assert!(buf.peek(3).is_none());
        assert!(buf.pop(3).is_none());
        assert_eq!(buf.size(), 2);
    }

    #[test]
    fn push_past_max_capacity_errors() {
        let mut buf = QueueBuffer::with_max_capacity(4);
        buf.push(b"ab").unwrap();
        assert!(buf.push(b"abc").is_err());
        assert_eq!(buf.size(), 2);
    }

    proptest! {
        #[test]
        fn arbitrary_chunking_preserves_stream(
            whole in prop::collection::vec(any::<u8>(), 0..512),
            chunk_sizes in prop::collection::vec(1usize..37, 1..64),
        ) {
            let mut buf = QueueBuffer::with_max_capacity(4096);
            let mut offset = 0;
            for chunk_size in chunk_sizes {
                if offset >= whole.len() {
                    break;
                }
                let end = (offset + chunk_size).min(whole.len());
                buf.push(&whole[offset..end]).unwrap();
                offset = end;
            }
            // Whatever didn't fit into the chunk plan goes in as one more push.
            if offset < whole.len() {
                buf.push(&whole[offset..]).unwrap();
            }

            let popped = buf.pop(whole.len()).unwrap_or_default();
            prop_assert_eq!(popped, whole);
        }
    }
}
