use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::{FrameError, Result};

/// Marker opening every frame.
pub const START_BYTE: u8 = 0x00;

/// Marker closing every frame.
pub const END_BYTE: u8 = 0x02;

/// Constant low bit carried by every interior (stuffed) byte.
pub const STUFFING_BIT: u8 = 0x01;

/// Payload bits carried by one stuffed byte.
pub const PAYLOAD_BITS: usize = 7;

/// Default maximum framed size accepted from a stream: 1 KiB.
///
/// Large enough for the biggest packet body (a 248-byte WRC packet frames
/// to 286 bytes).
pub const DEFAULT_MAX_FRAME: usize = 1024;

/// One decoded frame taken off a byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The recovered raw payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame around a raw payload.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The framed wire size of this payload (markers included).
    pub fn wire_size(&self) -> usize {
        encoded_len(self.payload.len())
    }
}

/// Framed length of a raw payload of `raw_len` bytes.
pub fn encoded_len(raw_len: usize) -> usize {
    (8 * raw_len).div_ceil(PAYLOAD_BITS) + 2
}

/// Raw length recovered from `stuffed_len` interior bytes.
pub fn decoded_len(stuffed_len: usize) -> usize {
    stuffed_len * PAYLOAD_BITS / 8
}

/// Encode a raw buffer into an SM7Bit frame.
///
/// Wire format:
/// ```text
/// ┌──────┬──────────────────────────────┬──────┐
/// │ 0x00 │ stuffed bytes: dddd ddd1 ... │ 0x02 │
/// │START │ 7 payload bits MSB-first     │ END  │
/// └──────┴──────────────────────────────┴──────┘
/// ```
///
/// Trailing capacity of the last stuffed byte is filled with `1` bits.
/// Never fails; an empty buffer encodes to `[0x00, 0x02]`.
pub fn encode(raw: &[u8]) -> Vec<u8> {
    let target_len = encoded_len(raw.len());
    let mut out = vec![0u8; target_len];
    out[0] = START_BYTE;

    let mut cursor = 8usize;
    for &byte in raw {
        for shift in (0..8).rev() {
            if cursor % 8 == 7 {
                set_bit(&mut out, cursor);
                cursor += 1;
            }
            if byte & (1 << shift) != 0 {
                set_bit(&mut out, cursor);
            }
            cursor += 1;
        }
    }

    while cursor / 8 < target_len - 1 {
        set_bit(&mut out, cursor);
        cursor += 1;
    }

    out[target_len - 1] = END_BYTE;
    out
}

/// Decode the first SM7Bit frame found in `framed`.
///
/// Bytes before the first START marker are ignored, as is everything after
/// the first END marker that follows it. Padding bits beyond the last whole
/// byte are discarded whatever their value.
pub fn decode(framed: &[u8]) -> Result<Vec<u8>> {
    let (start, end) = locate(framed).ok_or(FrameError::NoFrame)?;
    unstuff(&framed[start + 1..end])
}

/// Encode `raw` into an empty `out`, returning the framed length.
///
/// Refuses to touch an `out` that already holds data.
pub fn encode_into(raw: &[u8], out: &mut Vec<u8>) -> Result<usize> {
    if !out.is_empty() {
        return Err(FrameError::OutputOccupied { len: out.len() });
    }
    *out = encode(raw);
    Ok(out.len())
}

/// Decode `framed` into an empty `out`, returning the recovered length.
///
/// Refuses to touch an `out` that already holds data; on decode failure
/// `out` is left empty.
pub fn decode_into(framed: &[u8], out: &mut Vec<u8>) -> Result<usize> {
    if !out.is_empty() {
        return Err(FrameError::OutputOccupied { len: out.len() });
    }
    *out = decode(framed)?;
    Ok(out.len())
}

/// Append one encoded frame to `dst`.
pub fn encode_frame(raw: &[u8], dst: &mut BytesMut) {
    let framed = encode(raw);
    dst.reserve(framed.len());
    dst.put_slice(&framed);
}

/// Take the next frame off a stream buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// Noise before a START marker is dropped. A START seen while a frame is
/// still open restarts extraction there, since stuffed bytes are never
/// `0x00`. On success or `EmptyFrame` the frame bytes are consumed, so the
/// caller may simply call again.
pub fn decode_frame(src: &mut BytesMut, max_frame: usize) -> Result<Option<Frame>> {
    loop {
        let Some(start) = src.iter().position(|&b| b == START_BYTE) else {
            if !src.is_empty() {
                trace!(discarded = src.len(), "no START marker, dropping bytes");
                src.clear();
            }
            return Ok(None);
        };
        if start > 0 {
            trace!(discarded = start, "dropping bytes before START marker");
            src.advance(start);
        }

        let marker = src[1..]
            .iter()
            .position(|&b| b == START_BYTE || b == END_BYTE)
            .map(|offset| offset + 1);

        let Some(end) = marker else {
            if src.len() > max_frame {
                let size = src.len();
                src.clear();
                return Err(FrameError::FrameTooLarge {
                    size,
                    max: max_frame,
                });
            }
            return Ok(None); // Need more data
        };

        if src[end] == START_BYTE {
            trace!(discarded = end, "START inside open frame, resynchronizing");
            src.advance(end);
            continue;
        }

        let framed = src.split_to(end + 1);
        if framed.len() > max_frame {
            return Err(FrameError::FrameTooLarge {
                size: framed.len(),
                max: max_frame,
            });
        }

        let payload = unstuff(&framed[1..end])?;
        return Ok(Some(Frame::new(payload)));
    }
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum framed size in bytes. Default: 1 KiB.
    pub max_frame_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME,
        }
    }
}

fn locate(framed: &[u8]) -> Option<(usize, usize)> {
    let start = framed.iter().position(|&b| b == START_BYTE)?;
    let end = start + framed[start..].iter().position(|&b| b == END_BYTE)?;
    Some((start, end))
}

fn unstuff(stuffed: &[u8]) -> Result<Vec<u8>> {
    let target_len = decoded_len(stuffed.len());
    if target_len == 0 {
        return Err(FrameError::EmptyFrame);
    }

    let mut out = vec![0u8; target_len];
    let bits = stuffed
        .iter()
        .flat_map(|&byte| (1..8).rev().map(move |shift| (byte >> shift) & 1))
        .take(target_len * 8);
    for (cursor, bit) in bits.enumerate() {
        if bit != 0 {
            set_bit(&mut out, cursor);
        }
    }

    Ok(out)
}

// Bit 0 of a cursor is the MSB of the byte it lands in.
fn set_bit(buf: &mut [u8], cursor: usize) {
    buf[cursor / 8] |= 0x80 >> (cursor % 8);
}
