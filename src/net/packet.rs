//! Datagram and QUIC packet views delivered to filters

use std::net::SocketAddr;

use bytes::Bytes;

/// A UDP datagram delivered to a listener's read filters.
#[derive(Debug, Clone)]
pub struct Datagram {
    /// Source address of the datagram
    pub peer_addr: SocketAddr,
    /// Local address it arrived on
    pub local_addr: SocketAddr,
    /// Payload bytes
    pub payload: Bytes,
}

impl Datagram {
    /// Create a datagram.
    pub fn new(peer_addr: SocketAddr, local_addr: SocketAddr, payload: impl Into<Bytes>) -> Self {
        Self {
            peer_addr,
            local_addr,
            payload: payload.into(),
        }
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Check if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// View of a QUIC packet surfaced to listener filters while the chain
/// is still running.
///
/// A header length may be reported without the header bytes being
/// available; consumers must check [`headers`](Self::headers) before
/// touching them.
#[derive(Debug, Clone, Default)]
pub struct ReceivedPacket {
    length: usize,
    headers_length: usize,
    headers: Option<Bytes>,
}

impl ReceivedPacket {
    /// Packet with `length` payload bytes and no header view.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            length,
            headers_length: 0,
            headers: None,
        }
    }

    /// Attach the decrypted header bytes. The reported header length
    /// follows the attached bytes.
    #[must_use]
    pub fn with_headers(mut self, headers: impl Into<Bytes>) -> Self {
        let headers = headers.into();
        self.headers_length = headers.len();
        self.headers = Some(headers);
        self
    }

    /// Report a header length without making the bytes available.
    #[must_use]
    pub fn with_headers_length(mut self, headers_length: usize) -> Self {
        self.headers_length = headers_length;
        self
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Reported header length in bytes.
    #[must_use]
    pub fn headers_length(&self) -> usize {
        self.headers_length
    }

    /// Header bytes, when available.
    #[must_use]
    pub fn headers(&self) -> Option<&[u8]> {
        self.headers.as_deref()
    }
}
