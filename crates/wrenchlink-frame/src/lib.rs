//! SM7Bit framing for torque-wrench serial links.
//!
//! Every message is framed as:
//! - a `0x00` START byte
//! - the payload, 7 bits per byte MSB-first, each byte closed by a `1` bit
//! - a `0x02` END byte
//!
//! Because every stuffed byte is odd, `0x00` and `0x02` never appear inside a
//! frame, so a receiver can resynchronize on any byte stream.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::Sm7BitCodec;
pub use codec::{
    decode, decode_frame, decode_into, decoded_len, encode, encode_frame, encode_into,
    encoded_len, Frame, FrameConfig, DEFAULT_MAX_FRAME, END_BYTE, START_BYTE, STUFFING_BIT,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
