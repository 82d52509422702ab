/// Errors that can occur during SM7Bit encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// No START marker, no END marker after it, or END does not follow START.
    #[error("no SM7Bit frame found (expected 0x00 ... 0x02)")]
    NoFrame,

    /// A frame was found but carries no recoverable payload byte.
    #[error("SM7Bit frame carries no payload")]
    EmptyFrame,

    /// The caller handed over an output buffer that already holds data.
    #[error("output buffer already holds {len} bytes")]
    OutputOccupied { len: usize },

    /// The framed size exceeds the configured maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

impl FrameError {
    /// Whether the error only means "no usable frame in this buffer".
    ///
    /// Callers accumulating partial reads treat these as "keep reading".
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FrameError::NoFrame | FrameError::EmptyFrame)
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
