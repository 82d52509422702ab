use tracing::{debug, trace};

use crate::error::{PacketError, Result};

/// A fixed-size packet body carried inside one SM7Bit frame.
///
/// The whole body is always transmitted, including payload bytes past
/// `payload_len`, which are zero-filled.
pub trait WirePacket: Sized + Default {
    /// Size of the body image in bytes.
    const BODY_SIZE: usize;

    /// Serialize the full body image (exactly `BODY_SIZE` bytes).
    fn to_body(&self) -> Vec<u8>;

    /// Reinterpret a body image. `body` is exactly `BODY_SIZE` bytes long.
    fn parse_body(body: &[u8]) -> Self;

    /// Parse a decoded body, rejecting short buffers.
    ///
    /// Bytes past `BODY_SIZE` are ignored.
    fn from_body(body: &[u8]) -> Result<Self> {
        if body.len() < Self::BODY_SIZE {
            return Err(PacketError::Truncated {
                expected: Self::BODY_SIZE,
                actual: body.len(),
            });
        }
        if body.len() > Self::BODY_SIZE {
            trace!(
                extra = body.len() - Self::BODY_SIZE,
                "ignoring bytes past packet body"
            );
        }
        Ok(Self::parse_body(&body[..Self::BODY_SIZE]))
    }

    /// Frame the body for transmission.
    fn encode(&self) -> Vec<u8> {
        wrenchlink_frame::encode(&self.to_body())
    }

    /// Decode a packet from framed bytes.
    fn decode(framed: &[u8]) -> Result<Self> {
        let body = wrenchlink_frame::decode(framed)?;
        Self::from_body(&body)
    }

    /// Decode a packet, degrading instead of failing.
    ///
    /// A short body is zero-padded; bytes that hold no frame yield the
    /// default (all-zero) packet.
    fn decode_lossy(framed: &[u8]) -> Self {
        match wrenchlink_frame::decode(framed) {
            Ok(mut body) => {
                if body.len() < Self::BODY_SIZE {
                    debug!(
                        actual = body.len(),
                        expected = Self::BODY_SIZE,
                        "zero-padding short packet body"
                    );
                    body.resize(Self::BODY_SIZE, 0);
                }
                Self::parse_body(&body[..Self::BODY_SIZE])
            }
            Err(err) => {
                debug!(error = %err, "undecodable frame, using default packet");
                Self::default()
            }
        }
    }
}
