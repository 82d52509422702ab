//! SM7Bit framing and torque-wrench packets.
//!
//! # Crate Structure
//!
//! - [`frame`]: SM7Bit 7-bit stuffing codec, stream reader/writer
//! - [`packet`]: byte-exact USB-local and WRC packets over that framing
//! - [`port`]: serial port discovery, hot-plug watching and serial line access
//!
//! ```
//! use wrenchlink::frame;
//!
//! let framed = frame::encode(&[0xCA, 0xFE, 0xBA, 0xBE]);
//! assert_eq!(framed, [0x00, 0xCB, 0x7F, 0xAF, 0x57, 0xEF, 0x02]);
//! assert_eq!(frame::decode(&framed)?, [0xCA, 0xFE, 0xBA, 0xBE]);
//! # Ok::<(), wrenchlink::frame::FrameError>(())
//! ```

/// Re-export frame types.
pub mod frame {
    pub use wrenchlink_frame::*;
}

/// Re-export packet types.
pub mod packet {
    pub use wrenchlink_packet::*;
}

/// Re-export port types.
pub mod port {
    pub use wrenchlink_port::*;
}
