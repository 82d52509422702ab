use wrenchlink_frame::FrameError;

/// Errors that can occur while turning frames into packets.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// The bytes did not hold a usable SM7Bit frame.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The frame decoded to fewer bytes than the packet body.
    #[error("packet body truncated ({actual} bytes, expected {expected})")]
    Truncated { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, PacketError>;
