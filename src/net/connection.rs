//! Connection view exposed to filters that may terminate it

use std::fmt;

use tracing::debug;

/// How a connection should be shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Tear down immediately without flushing buffered write data.
    NoFlush,
    /// Flush pending write data before closing.
    FlushWrite,
}

impl fmt::Display for CloseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFlush => write!(f, "no-flush"),
            Self::FlushWrite => write!(f, "flush-write"),
        }
    }
}

/// Server side of an accepted connection, as visible to filters that
/// may need to terminate it.
pub trait Connection: Send {
    /// Close the connection. `reason` is surfaced in transport failure
    /// details for debugging.
    fn close(&mut self, mode: CloseMode, reason: &str);

    /// Whether a close has been requested.
    fn is_closed(&self) -> bool;
}

/// Close request captured by a [`HarnessConnection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseRecord {
    /// Shutdown mode requested
    pub mode: CloseMode,
    /// Diagnostic reason supplied by the closer
    pub reason: String,
}

/// In-memory connection that records close requests instead of
/// touching a transport. Only the first close is retained.
#[derive(Debug, Default)]
pub struct HarnessConnection {
    close: Option<CloseRecord>,
}

impl HarnessConnection {
    /// Create an open connection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First close requested on this connection, if any.
    #[must_use]
    pub fn close_record(&self) -> Option<&CloseRecord> {
        self.close.as_ref()
    }
}

impl Connection for HarnessConnection {
    fn close(&mut self, mode: CloseMode, reason: &str) {
        if let Some(existing) = &self.close {
            debug!(
                mode = %mode,
                prior = %existing.mode,
                "ignoring close on already-closed connection"
            );
            return;
        }
        debug!(mode = %mode, reason = reason, "closing connection");
        self.close = Some(CloseRecord {
            mode,
            reason: reason.to_string(),
        });
    }

    fn is_closed(&self) -> bool {
        self.close.is_some()
    }
}
