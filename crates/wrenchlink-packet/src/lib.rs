//! Byte-exact torque-wrench packets carried in SM7Bit frames.
//!
//! Two packet families share the same framing:
//!
//! - [`UsbLocalPacket`]: host <-> USB dongle control (12-byte body).
//! - [`WrcPacket`]: wrench <-> controller traffic (248-byte body).
//!
//! Both implement [`WirePacket`], which turns a packet into a framed byte
//! sequence and back:
//!
//! ```
//! use wrenchlink_packet::{WirePacket, WrcPacket, WrcPayload, SetWrenchTime};
//!
//! let packet = WrcPacket::with_payload(WrcPayload::SetWrenchTime(SetWrenchTime {
//!     unix_time: 1_700_000_000,
//! }));
//! let framed = packet.encode();
//! assert_eq!(framed.len(), 286);
//! assert_eq!(WrcPacket::decode(&framed)?, packet);
//! # Ok::<(), wrenchlink_packet::PacketError>(())
//! ```

mod error;
mod flags;
mod joint;
mod usb;
mod wire;
mod wrc;

pub use error::{PacketError, Result};
pub use flags::{EnergyFlags, InfoRequest, JointConfigFlags, JointFlags, WrcFlags};
pub use joint::{Direction, JointMethod, JointMode, JointUnit, WrcStatus};
pub use usb::{
    LoraParams, MacMode, RfControl, RfStatus, UsbLocalPacket, UsbLocalPacketType,
    UsbLocalPayload, USB_BODY_SIZE, USB_PAYLOAD_SIZE,
};
pub use wire::WirePacket;
pub use wrc::{
    GetInfo, GetJointData, InfoEnergy, InfoGeneric, InfoNetwork, InfoSerial, InfoTiming,
    InlineJointData, PacketCounters, RxSignal, SetJoint, SetWrenchTime, StatusReport, WrcPacket,
    WrcPacketType, WrcPayload, INLINE_JOINT_SIZE, MAX_INLINE_JOINTS, WRC_BODY_SIZE,
    WRC_HEADER_SIZE, WRC_PAYLOAD_SIZE,
};
