use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::codec::{decode_frame, encode_frame, encoded_len, Frame, FrameConfig};
use crate::error::{FrameError, Result};

/// `tokio_util` codec speaking SM7Bit frames, for use with `FramedRead`,
/// `FramedWrite` or `Framed` over an async serial stream.
#[derive(Debug, Clone, Default)]
pub struct Sm7BitCodec {
    config: FrameConfig,
}

impl Sm7BitCodec {
    /// Create a codec with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }
}

impl Decoder for Sm7BitCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        loop {
            match decode_frame(src, self.config.max_frame_size) {
                Err(err) if err.is_recoverable() => {
                    debug!(error = %err, "skipping frame");
                }
                other => return other,
            }
        }
    }
}

impl<'a> Encoder<&'a [u8]> for Sm7BitCodec {
    type Error = FrameError;

    fn encode(&mut self, raw: &'a [u8], dst: &mut BytesMut) -> Result<()> {
        let size = encoded_len(raw.len());
        if size > self.config.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size,
                max: self.config.max_frame_size,
            });
        }
        encode_frame(raw, dst);
        Ok(())
    }
}

impl Encoder<Frame> for Sm7BitCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&[u8]>::encode(self, frame.payload.as_ref(), dst)
    }
}
