//! Buffered prefix handed to data callbacks

use bytes::{Buf, BytesMut};

/// Accumulated prefix of a connection's initial bytes.
///
/// The driver appends bytes as they arrive on the socket; the paused
/// filter inspects the accumulated prefix and may discard part of it
/// before the connection is handed onward. An optional limit models
/// the read-ahead window granted to that filter.
#[derive(Debug, Default)]
pub struct AcceptBuffer {
    data: BytesMut,
    limit: Option<usize>,
}

impl AcceptBuffer {
    /// Create an unbounded buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that refuses to grow beyond `limit` bytes.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            data: BytesMut::new(),
            limit: Some(limit),
        }
    }

    /// Append bytes, honoring the limit.
    ///
    /// Returns how many bytes were actually taken; the rest stay on
    /// the socket from the driver's point of view.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> usize {
        let take = match self.limit {
            Some(limit) => bytes.len().min(limit.saturating_sub(self.data.len())),
            None => bytes.len(),
        };
        self.data.extend_from_slice(&bytes[..take]);
        take
    }

    /// Discard the first `count` buffered bytes.
    ///
    /// Returns `false` and leaves the buffer untouched when fewer than
    /// `count` bytes are buffered.
    pub fn drain(&mut self, count: usize) -> bool {
        if count > self.data.len() {
            return false;
        }
        self.data.advance(count);
        true
    }

    /// The buffered bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Number of buffered bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Capacity limit, if one was set.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

impl From<&[u8]> for AcceptBuffer {
    fn from(bytes: &[u8]) -> Self {
        let mut buffer = Self::new();
        buffer.extend_from_slice(bytes);
        buffer
    }
}
