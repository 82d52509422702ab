//! WRC wireless torque-wrench packets (wrench <-> controller).
//!
//! All multi-byte fields are little-endian, no padding between fields.
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0x00    2B    sequence_id
//! 0x02    4B    mac (random per-device session id, not an IEEE MAC)
//! 0x06    1B    flags (direction:1 | variable_len:1 | type:6)
//! 0x07    1B    payload_len
//! 0x08    240B  payload (zero-filled past the active variant)
//! ```

use bytes::{Buf, BufMut};

use crate::flags::{EnergyFlags, InfoRequest, JointConfigFlags, JointFlags, WrcFlags};
use crate::wire::WirePacket;

/// Size of the payload area.
pub const WRC_PAYLOAD_SIZE: usize = 240;

/// Size of the fixed header in front of the payload.
pub const WRC_HEADER_SIZE: usize = 8;

/// Size of the full packet body.
pub const WRC_BODY_SIZE: usize = WRC_HEADER_SIZE + WRC_PAYLOAD_SIZE;

/// Wire size of one inline joint record.
pub const INLINE_JOINT_SIZE: usize = 15;

/// Most inline joint records one payload can hold.
pub const MAX_INLINE_JOINTS: usize = WRC_PAYLOAD_SIZE / INLINE_JOINT_SIZE;

/// Discriminants of the 6-bit `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum WrcPacketType {
    Unknown = 0,
    InfoGeneric = 1,
    InfoSerial = 2,
    InfoTiming = 3,
    InfoEnergy = 4,
    InfoNetwork = 5,
    GetInfo = 6,
    SetJoint = 7,
    SetWrenchTime = 8,
    GetJointData = 9,
    ClearJointData = 10,
    GetStatusReport = 11,
    Beep = 12,
    JointData = 13,
    StatusReport = 14,
    InlineJointData = 15,
}

impl WrcPacketType {
    pub fn from_u8(value: u8) -> Option<Self> {
        let kind = match value {
            0 => Self::Unknown,
            1 => Self::InfoGeneric,
            2 => Self::InfoSerial,
            3 => Self::InfoTiming,
            4 => Self::InfoEnergy,
            5 => Self::InfoNetwork,
            6 => Self::GetInfo,
            7 => Self::SetJoint,
            8 => Self::SetWrenchTime,
            9 => Self::GetJointData,
            10 => Self::ClearJointData,
            11 => Self::GetStatusReport,
            12 => Self::Beep,
            13 => Self::JointData,
            14 => Self::StatusReport,
            15 => Self::InlineJointData,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InfoGeneric {
    /// Joints currently stored on the wrench.
    pub joint_count: u16,
    /// `sequence_id` of the last packet received from the controller.
    pub last_server_packet_seqid: u16,
}

/// Wrench serial number, stored as 16 raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InfoSerial {
    pub serial: [u8; 16],
}

impl InfoSerial {
    /// The serial as the little-endian integer the controller keys on.
    pub fn as_u128(&self) -> u128 {
        u128::from_le_bytes(self.serial)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InfoTiming {
    /// Processor uptime in milliseconds.
    pub cpu_ticks: u32,
    /// Wrench clock, unix time.
    pub wrench_time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InfoEnergy {
    pub flag: EnergyFlags,
    pub battery_voltage_mv: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PacketCounters {
    pub collisions: u16,
    pub crc_errors: u16,
    pub tx_count: u16,
    pub rx_wanted_count: u16,
    pub rx_unwanted_count: u16,
}

/// Signal state of the last received packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RxSignal {
    pub rx_rssi: i8,
    pub rx_snr: i8,
    pub rx_rscp: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InfoNetwork {
    pub packets: PacketCounters,
    pub rf: RxSignal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GetInfo {
    pub flag: InfoRequest,
}

/// Joint target sent to the wrench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SetJoint {
    pub torque_setpoint: i32,
    pub torque_angle_start: i32,
    pub torque_upper_tol: i32,
    pub torque_lower_tol: i32,
    pub angle: i16,
    pub angle_upper_tol: i16,
    pub angle_lower_tol: i16,
    pub fdt: i32,
    pub fda: i16,
    pub task_repeat_times: u16,
    pub task_id: u16,
    pub flag: JointConfigFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SetWrenchTime {
    pub unix_time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GetJointData {
    // Declared signed by the firmware, unsigned everywhere it is used.
    pub joint_id_start: u16,
    pub joint_count: u8,
}

/// Acknowledgement of a controller request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusReport {
    pub target_seqid: u16,
    /// Raw status; see [`crate::WrcStatus`]. 0 means no error.
    pub status: u16,
}

/// One joint measurement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InlineJointData {
    /// Auto-incremented on the wrench.
    pub joint_id: u16,
    pub task_id: u16,
    pub unix_time: u32,
    pub flag: JointFlags,
    pub torque: i32,
    pub angle: i16,
}

impl InlineJointData {
    fn write_to(&self, dst: &mut Vec<u8>) {
        dst.put_u16_le(self.joint_id);
        dst.put_u16_le(self.task_id);
        dst.put_u32_le(self.unix_time);
        dst.put_u8(self.flag.as_byte());
        dst.put_i32_le(self.torque);
        dst.put_i16_le(self.angle);
    }

    fn read_from(src: &mut &[u8]) -> Self {
        Self {
            joint_id: src.get_u16_le(),
            task_id: src.get_u16_le(),
            unix_time: src.get_u32_le(),
            flag: JointFlags::from_byte(src.get_u8()),
            torque: src.get_i32_le(),
            angle: src.get_i16_le(),
        }
    }
}

/// Active payload variant of a WRC packet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "fields", rename_all = "kebab-case"))]
pub enum WrcPayload {
    /// No payload (type `Unknown`, length 0).
    #[default]
    None,
    InfoGeneric(InfoGeneric),
    InfoSerial(InfoSerial),
    InfoTiming(InfoTiming),
    InfoEnergy(InfoEnergy),
    InfoNetwork(InfoNetwork),
    GetInfo(GetInfo),
    SetJoint(SetJoint),
    SetWrenchTime(SetWrenchTime),
    GetJointData(GetJointData),
    ClearJointData,
    GetStatusReport,
    Beep,
    /// Layout not published by the firmware; kept as bytes.
    JointData(Vec<u8>),
    StatusReport(StatusReport),
    /// One record, or `payload_len / 15` records when `variable_len` is set.
    InlineJointData(Vec<InlineJointData>),
    /// Bytes of a type without a known layout.
    Raw(Vec<u8>),
}

impl WrcPayload {
    /// The `type` value this variant is sent with; `None` for raw bytes.
    pub fn packet_type(&self) -> Option<WrcPacketType> {
        let kind = match self {
            Self::None => WrcPacketType::Unknown,
            Self::InfoGeneric(_) => WrcPacketType::InfoGeneric,
            Self::InfoSerial(_) => WrcPacketType::InfoSerial,
            Self::InfoTiming(_) => WrcPacketType::InfoTiming,
            Self::InfoEnergy(_) => WrcPacketType::InfoEnergy,
            Self::InfoNetwork(_) => WrcPacketType::InfoNetwork,
            Self::GetInfo(_) => WrcPacketType::GetInfo,
            Self::SetJoint(_) => WrcPacketType::SetJoint,
            Self::SetWrenchTime(_) => WrcPacketType::SetWrenchTime,
            Self::GetJointData(_) => WrcPacketType::GetJointData,
            Self::ClearJointData => WrcPacketType::ClearJointData,
            Self::GetStatusReport => WrcPacketType::GetStatusReport,
            Self::Beep => WrcPacketType::Beep,
            Self::JointData(_) => WrcPacketType::JointData,
            Self::StatusReport(_) => WrcPacketType::StatusReport,
            Self::InlineJointData(_) => WrcPacketType::InlineJointData,
            Self::Raw(_) => return None,
        };
        Some(kind)
    }

    /// Bytes this variant occupies on the wire (at most 240).
    pub fn wire_len(&self) -> usize {
        let len = match self {
            Self::None | Self::ClearJointData | Self::GetStatusReport | Self::Beep => 0,
            Self::InfoGeneric(_) => 4,
            Self::InfoSerial(_) => 16,
            Self::InfoTiming(_) => 8,
            Self::InfoEnergy(_) => 3,
            Self::InfoNetwork(_) => 13,
            Self::GetInfo(_) => 1,
            Self::SetJoint(_) => 33,
            Self::SetWrenchTime(_) => 4,
            Self::GetJointData(_) => 3,
            Self::StatusReport(_) => 4,
            Self::InlineJointData(records) => records.len() * INLINE_JOINT_SIZE,
            Self::JointData(bytes) | Self::Raw(bytes) => bytes.len(),
        };
        len.min(WRC_PAYLOAD_SIZE)
    }

    // Anything past the payload area is cut off by the caller.
    fn write_to(&self, dst: &mut Vec<u8>) {
        match self {
            Self::None | Self::ClearJointData | Self::GetStatusReport | Self::Beep => {}
            Self::InfoGeneric(info) => {
                dst.put_u16_le(info.joint_count);
                dst.put_u16_le(info.last_server_packet_seqid);
            }
            Self::InfoSerial(info) => dst.put_slice(&info.serial),
            Self::InfoTiming(info) => {
                dst.put_u32_le(info.cpu_ticks);
                dst.put_u32_le(info.wrench_time);
            }
            Self::InfoEnergy(info) => {
                dst.put_u8(info.flag.as_byte());
                dst.put_u16_le(info.battery_voltage_mv);
            }
            Self::InfoNetwork(info) => {
                dst.put_u16_le(info.packets.collisions);
                dst.put_u16_le(info.packets.crc_errors);
                dst.put_u16_le(info.packets.tx_count);
                dst.put_u16_le(info.packets.rx_wanted_count);
                dst.put_u16_le(info.packets.rx_unwanted_count);
                dst.put_i8(info.rf.rx_rssi);
                dst.put_i8(info.rf.rx_snr);
                dst.put_i8(info.rf.rx_rscp);
            }
            Self::GetInfo(request) => dst.put_u8(request.flag.as_byte()),
            Self::SetJoint(joint) => {
                dst.put_i32_le(joint.torque_setpoint);
                dst.put_i32_le(joint.torque_angle_start);
                dst.put_i32_le(joint.torque_upper_tol);
                dst.put_i32_le(joint.torque_lower_tol);
                dst.put_i16_le(joint.angle);
                dst.put_i16_le(joint.angle_upper_tol);
                dst.put_i16_le(joint.angle_lower_tol);
                dst.put_i32_le(joint.fdt);
                dst.put_i16_le(joint.fda);
                dst.put_u16_le(joint.task_repeat_times);
                dst.put_u16_le(joint.task_id);
                dst.put_u8(joint.flag.as_byte());
            }
            Self::SetWrenchTime(time) => dst.put_u32_le(time.unix_time),
            Self::GetJointData(request) => {
                dst.put_u16_le(request.joint_id_start);
                dst.put_u8(request.joint_count);
            }
            Self::StatusReport(report) => {
                dst.put_u16_le(report.target_seqid);
                dst.put_u16_le(report.status);
            }
            Self::InlineJointData(records) => {
                for record in records.iter().take(MAX_INLINE_JOINTS) {
                    record.write_to(dst);
                }
            }
            Self::JointData(bytes) | Self::Raw(bytes) => dst.put_slice(&bytes[..self.wire_len()]),
        }
    }

    // `src` is the whole payload area.
    fn parse(flags: WrcFlags, payload_len: u8, mut src: &[u8]) -> Self {
        let declared = usize::from(payload_len);
        let Some(kind) = WrcPacketType::from_u8(flags.packet_type()) else {
            return Self::Raw(src[..declared].to_vec());
        };

        match kind {
            WrcPacketType::Unknown if declared == 0 => Self::None,
            WrcPacketType::Unknown => Self::Raw(src[..declared].to_vec()),
            WrcPacketType::InfoGeneric => Self::InfoGeneric(InfoGeneric {
                joint_count: src.get_u16_le(),
                last_server_packet_seqid: src.get_u16_le(),
            }),
            WrcPacketType::InfoSerial => {
                let mut serial = [0u8; 16];
                src.copy_to_slice(&mut serial);
                Self::InfoSerial(InfoSerial { serial })
            }
            WrcPacketType::InfoTiming => Self::InfoTiming(InfoTiming {
                cpu_ticks: src.get_u32_le(),
                wrench_time: src.get_u32_le(),
            }),
            WrcPacketType::InfoEnergy => Self::InfoEnergy(InfoEnergy {
                flag: EnergyFlags::from_byte(src.get_u8()),
                battery_voltage_mv: src.get_u16_le(),
            }),
            WrcPacketType::InfoNetwork => Self::InfoNetwork(InfoNetwork {
                packets: PacketCounters {
                    collisions: src.get_u16_le(),
                    crc_errors: src.get_u16_le(),
                    tx_count: src.get_u16_le(),
                    rx_wanted_count: src.get_u16_le(),
                    rx_unwanted_count: src.get_u16_le(),
                },
                rf: RxSignal {
                    rx_rssi: src.get_i8(),
                    rx_snr: src.get_i8(),
                    rx_rscp: src.get_i8(),
                },
            }),
            WrcPacketType::GetInfo => Self::GetInfo(GetInfo {
                flag: InfoRequest::from_byte(src.get_u8()),
            }),
            WrcPacketType::SetJoint => Self::SetJoint(SetJoint {
                torque_setpoint: src.get_i32_le(),
                torque_angle_start: src.get_i32_le(),
                torque_upper_tol: src.get_i32_le(),
                torque_lower_tol: src.get_i32_le(),
                angle: src.get_i16_le(),
                angle_upper_tol: src.get_i16_le(),
                angle_lower_tol: src.get_i16_le(),
                fdt: src.get_i32_le(),
                fda: src.get_i16_le(),
                task_repeat_times: src.get_u16_le(),
                task_id: src.get_u16_le(),
                flag: JointConfigFlags::from_byte(src.get_u8()),
            }),
            WrcPacketType::SetWrenchTime => Self::SetWrenchTime(SetWrenchTime {
                unix_time: src.get_u32_le(),
            }),
            WrcPacketType::GetJointData => Self::GetJointData(GetJointData {
                joint_id_start: src.get_u16_le(),
                joint_count: src.get_u8(),
            }),
            WrcPacketType::ClearJointData => Self::ClearJointData,
            WrcPacketType::GetStatusReport => Self::GetStatusReport,
            WrcPacketType::Beep => Self::Beep,
            WrcPacketType::JointData => Self::JointData(src[..declared].to_vec()),
            WrcPacketType::StatusReport => Self::StatusReport(StatusReport {
                target_seqid: src.get_u16_le(),
                status: src.get_u16_le(),
            }),
            WrcPacketType::InlineJointData => {
                let count = if flags.variable_len() == 1 {
                    declared / INLINE_JOINT_SIZE
                } else {
                    1
                };
                let records = (0..count)
                    .map(|_| InlineJointData::read_from(&mut src))
                    .collect();
                Self::InlineJointData(records)
            }
        }
    }
}

/// A WRC packet, framed with SM7Bit on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WrcPacket {
    sequence_id: u16,
    mac: u32,
    flags: WrcFlags,
    payload_len: u8,
    payload: WrcPayload,
}

impl WrcPacket {
    /// Build a packet whose type, variable-length bit and length follow the
    /// payload variant.
    ///
    /// `Raw` payloads keep type `Unknown`; set it with [`Self::set_packet_type`].
    pub fn with_payload(payload: WrcPayload) -> Self {
        let mut packet = Self::default();
        packet.set_payload(payload);
        packet
    }

    pub fn sequence_id(&self) -> u16 {
        self.sequence_id
    }

    pub fn set_sequence_id(&mut self, sequence_id: u16) {
        self.sequence_id = sequence_id;
    }

    /// Per-device session id, randomly chosen by the wrench at power-on.
    pub fn mac(&self) -> u32 {
        self.mac
    }

    pub fn set_mac(&mut self, mac: u32) {
        self.mac = mac;
    }

    pub fn direction(&self) -> u8 {
        self.flags.direction()
    }

    /// Set the direction bit; input is masked to 1 bit.
    pub fn set_direction(&mut self, direction: u8) {
        self.flags.set_direction(direction);
    }

    pub fn variable_len(&self) -> u8 {
        self.flags.variable_len()
    }

    /// Set the variable-length bit; input is masked to 1 bit.
    ///
    /// The payload is re-read under the new header, as a decode would.
    pub fn set_variable_len(&mut self, variable_len: u8) {
        self.flags.set_variable_len(variable_len);
        self.reinterpret();
    }

    pub fn packet_type(&self) -> u8 {
        self.flags.packet_type()
    }

    /// Set the packet type; input is masked to 6 bits.
    ///
    /// The payload bytes stay in place and are re-read as the new type, so
    /// `SetWrenchTime` retyped to `Beep` carries no payload afterwards.
    pub fn set_packet_type(&mut self, packet_type: u8) {
        self.flags.set_packet_type(packet_type);
        self.reinterpret();
    }

    /// The type field as a known discriminant.
    pub fn kind(&self) -> Option<WrcPacketType> {
        WrcPacketType::from_u8(self.packet_type())
    }

    pub fn flags(&self) -> WrcFlags {
        self.flags
    }

    pub fn payload_len(&self) -> u8 {
        self.payload_len
    }

    /// Set the payload length, clamped to 240.
    pub fn set_payload_len(&mut self, payload_len: u8) {
        self.payload_len = payload_len.min(WRC_PAYLOAD_SIZE as u8);
        self.reinterpret();
    }

    pub fn payload(&self) -> &WrcPayload {
        &self.payload
    }

    /// Replace the payload and update type, variable-length bit and length
    /// to match it. A `Raw` payload keeps the current type.
    pub fn set_payload(&mut self, payload: WrcPayload) {
        if let Some(kind) = payload.packet_type() {
            self.flags.set_packet_type(kind as u8);
        }
        if let WrcPayload::InlineJointData(records) = &payload {
            self.flags.set_variable_len(u8::from(records.len() != 1));
        }
        self.payload_len = payload.wire_len() as u8;
        self.payload = payload;
        self.reinterpret();
    }

    // Keeps `payload` equal to what decoding this packet's body yields.
    fn reinterpret(&mut self) {
        let mut area = Vec::with_capacity(WRC_PAYLOAD_SIZE);
        self.payload.write_to(&mut area);
        area.resize(WRC_PAYLOAD_SIZE, 0);
        self.payload = WrcPayload::parse(self.flags, self.payload_len, &area);
    }
}

impl WirePacket for WrcPacket {
    const BODY_SIZE: usize = WRC_BODY_SIZE;

    fn to_body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(WRC_BODY_SIZE);
        body.put_u16_le(self.sequence_id);
        body.put_u32_le(self.mac);
        body.put_u8(self.flags.as_byte());
        body.put_u8(self.payload_len);
        self.payload.write_to(&mut body);
        body.resize(WRC_BODY_SIZE, 0);
        body
    }

    fn parse_body(mut body: &[u8]) -> Self {
        let sequence_id = body.get_u16_le();
        let mac = body.get_u32_le();
        let flags = WrcFlags::from_byte(body.get_u8());
        let payload_len = body.get_u8().min(WRC_PAYLOAD_SIZE as u8);
        let payload = WrcPayload::parse(flags, payload_len, body);
        Self {
            sequence_id,
            mac,
            flags,
            payload_len,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::joint::{Direction, JointMethod, JointMode, JointUnit};

    fn sample_joint(joint_id: u16) -> InlineJointData {
        let mut flag = JointFlags::default();
        flag.set_valid(true);
        flag.set_ok(true);
        flag.set_mode(JointMode::Torque);
        flag.set_method(JointMethod::Click);
        flag.set_unit(JointUnit::Nm);
        InlineJointData {
            joint_id,
            task_id: 7,
            unix_time: 1_700_000_000,
            flag,
            torque: 25_500,
            angle: -12,
        }
    }

    #[test]
    fn default_packet_encoding() {
        let encoded = WrcPacket::default().encode();

        assert_eq!(encoded.len(), 286);
        assert_eq!(encoded[0], 0x00);
        for &byte in &encoded[1..encoded.len() - 2] {
            assert_eq!(byte, 0x01);
        }
        assert_eq!(encoded[encoded.len() - 2], 0x1F);
        assert_eq!(encoded[encoded.len() - 1], 0x02);
    }

    #[test]
    fn default_packet_roundtrip() {
        let encoded = WrcPacket::default().encode();
        let decoded = WrcPacket::decode(&encoded).unwrap();
        assert_eq!(decoded, WrcPacket::default());
        assert_eq!(decoded.encode(), encoded);
    }

    #[test]
    fn header_layout() {
        let mut packet = WrcPacket::with_payload(WrcPayload::GetInfo(GetInfo {
            flag: InfoRequest::SERIAL,
        }));
        packet.set_sequence_id(0x1234);
        packet.set_mac(0xDEAD_BEEF);
        packet.set_direction(Direction::FromServer.into());

        let body = packet.to_body();
        assert_eq!(body.len(), WRC_BODY_SIZE);
        assert_eq!(&body[..2], &[0x34, 0x12]);
        assert_eq!(&body[2..6], &[0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(body[6], 25);
        assert_eq!(body[7], 1);
        assert_eq!(body[8], 0x01);
        assert!(body[9..].iter().all(|&b| b == 0));
    }

    #[test]
    fn setters_mask_bit_fields() {
        let mut packet = WrcPacket::default();
        packet.set_packet_type(0xFF);
        packet.set_direction(0x02);
        packet.set_variable_len(0x03);
        packet.set_payload_len(255);

        assert_eq!(packet.packet_type(), 0x3F);
        assert_eq!(packet.direction(), 0);
        assert_eq!(packet.variable_len(), 1);
        assert_eq!(packet.payload_len(), 240);
        assert_eq!(packet.kind(), None);
    }

    #[test]
    fn set_joint_layout_and_roundtrip() {
        let mut flag = JointConfigFlags::default();
        flag.set_mode(JointMode::AngleTorque);
        flag.set_method(JointMethod::Track);
        flag.set_unit(JointUnit::InLb);
        let joint = SetJoint {
            torque_setpoint: 30_000,
            torque_angle_start: 5_000,
            torque_upper_tol: 1_500,
            torque_lower_tol: -1_500,
            angle: 90,
            angle_upper_tol: 5,
            angle_lower_tol: -5,
            fdt: 100,
            fda: 2,
            task_repeat_times: 4,
            task_id: 42,
            flag,
        };
        let packet = WrcPacket::with_payload(WrcPayload::SetJoint(joint));

        let body = packet.to_body();
        assert_eq!(body[7], 33);
        assert_eq!(&body[8..12], &30_000i32.to_le_bytes());
        assert_eq!(&body[24..26], &90i16.to_le_bytes());
        assert_eq!(&body[30..34], &100i32.to_le_bytes());
        assert_eq!(&body[34..36], &2i16.to_le_bytes());
        assert_eq!(&body[36..38], &4u16.to_le_bytes());
        assert_eq!(&body[38..40], &42u16.to_le_bytes());
        assert_eq!(body[40], 0b0110_1100);
        assert!(body[41..].iter().all(|&b| b == 0));

        let decoded = WrcPacket::decode(&packet.encode()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn info_network_layout() {
        let info = InfoNetwork {
            packets: PacketCounters {
                collisions: 1,
                crc_errors: 2,
                tx_count: 3,
                rx_wanted_count: 4,
                rx_unwanted_count: 5,
            },
            rf: RxSignal {
                rx_rssi: -80,
                rx_snr: 9,
                rx_rscp: -95,
            },
        };
        let packet = WrcPacket::with_payload(WrcPayload::InfoNetwork(info));
        let body = packet.to_body();

        assert_eq!(body[7], 13);
        assert_eq!(&body[8..18], &[1, 0, 2, 0, 3, 0, 4, 0, 5, 0]);
        assert_eq!(&body[18..21], &[(-80i8) as u8, 9, (-95i8) as u8]);
        assert_eq!(WrcPacket::parse_body(&body), packet);
    }

    #[test]
    fn single_inline_joint() {
        let packet = WrcPacket::with_payload(WrcPayload::InlineJointData(vec![sample_joint(1)]));
        assert_eq!(packet.variable_len(), 0);
        assert_eq!(packet.payload_len(), 15);

        let decoded = WrcPacket::decode(&packet.encode()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn variable_length_inline_joints() {
        let records: Vec<_> = (1..=3).map(sample_joint).collect();
        let packet = WrcPacket::with_payload(WrcPayload::InlineJointData(records.clone()));
        assert_eq!(packet.variable_len(), 1);
        assert_eq!(packet.payload_len(), 45);

        let decoded = WrcPacket::decode(&packet.encode()).unwrap();
        assert_eq!(decoded.payload(), &WrcPayload::InlineJointData(records));
    }

    #[test]
    fn inline_joints_are_capped_by_payload_area() {
        let records: Vec<_> = (0..20).map(sample_joint).collect();
        let packet = WrcPacket::with_payload(WrcPayload::InlineJointData(records));
        assert_eq!(packet.payload_len(), 240);

        let decoded = WrcPacket::decode(&packet.encode()).unwrap();
        match decoded.payload() {
            WrcPayload::InlineJointData(records) => {
                assert_eq!(records.len(), MAX_INLINE_JOINTS);
                assert_eq!(records[15].joint_id, 15);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn bodiless_commands() {
        for payload in [WrcPayload::ClearJointData, WrcPayload::Beep, WrcPayload::GetStatusReport] {
            let packet = WrcPacket::with_payload(payload.clone());
            assert_eq!(packet.payload_len(), 0);
            let decoded = WrcPacket::decode(&packet.encode()).unwrap();
            assert_eq!(decoded.payload(), &payload);
        }
    }

    #[test]
    fn undefined_type_keeps_raw_bytes() {
        let mut packet = WrcPacket::with_payload(WrcPayload::Raw(vec![9, 8, 7]));
        packet.set_packet_type(40);

        let decoded = WrcPacket::decode(&packet.encode()).unwrap();
        assert_eq!(decoded.packet_type(), 40);
        assert_eq!(decoded.payload(), &WrcPayload::Raw(vec![9, 8, 7]));
    }

    #[test]
    fn retyping_rereads_payload_bytes() {
        let mut packet = WrcPacket::with_payload(WrcPayload::SetWrenchTime(SetWrenchTime {
            unix_time: 0xAABB_CCDD,
        }));
        packet.set_packet_type(WrcPacketType::StatusReport as u8);
        assert_eq!(
            packet.payload(),
            &WrcPayload::StatusReport(StatusReport {
                target_seqid: 0xCCDD,
                status: 0xAABB,
            })
        );
        assert_eq!(WrcPacket::decode(&packet.encode()).unwrap(), packet);

        packet.set_packet_type(WrcPacketType::Beep as u8);
        assert_eq!(packet.payload(), &WrcPayload::Beep);
        assert_eq!(packet.payload_len(), 4);
        assert_eq!(WrcPacket::decode(&packet.encode()).unwrap(), packet);
    }

    #[test]
    fn set_payload_updates_header() {
        let mut packet = WrcPacket::with_payload(WrcPayload::Beep);
        packet.set_sequence_id(9);
        packet.set_payload(WrcPayload::GetJointData(GetJointData {
            joint_id_start: 4,
            joint_count: 2,
        }));
        assert_eq!(packet.kind(), Some(WrcPacketType::GetJointData));
        assert_eq!(packet.payload_len(), 3);
        assert_eq!(packet.sequence_id(), 9);

        packet.set_payload(WrcPayload::InlineJointData((0..2).map(sample_joint).collect()));
        assert_eq!(packet.variable_len(), 1);
        assert_eq!(packet.payload_len(), 30);
        assert_eq!(WrcPacket::decode(&packet.encode()).unwrap(), packet);
    }

    #[test]
    fn shrinking_length_drops_inline_records() {
        let mut packet =
            WrcPacket::with_payload(WrcPayload::InlineJointData((0..3).map(sample_joint).collect()));
        packet.set_payload_len(30);
        assert_eq!(
            packet.payload(),
            &WrcPayload::InlineJointData((0..2).map(sample_joint).collect())
        );

        packet.set_variable_len(0);
        assert_eq!(packet.payload(), &WrcPayload::InlineJointData(vec![sample_joint(0)]));
        assert_eq!(WrcPacket::decode(&packet.encode()).unwrap(), packet);
    }

    #[test]
    fn oversized_inline_payload_is_stored_as_sent() {
        let packet =
            WrcPacket::with_payload(WrcPayload::InlineJointData((0..20).map(sample_joint).collect()));
        match packet.payload() {
            WrcPayload::InlineJointData(records) => assert_eq!(records.len(), MAX_INLINE_JOINTS),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn serial_as_integer() {
        let mut serial = [0u8; 16];
        serial[0] = 0x01;
        serial[1] = 0x02;
        assert_eq!(InfoSerial { serial }.as_u128(), 0x0201);
    }

    fn inline_joint_strategy() -> impl Strategy<Value = InlineJointData> {
        (any::<u16>(), any::<u16>(), any::<u32>(), any::<u8>(), any::<i32>(), any::<i16>()).prop_map(
            |(joint_id, task_id, unix_time, flag, torque, angle)| InlineJointData {
                joint_id,
                task_id,
                unix_time,
                flag: JointFlags::from_byte(flag),
                torque,
                angle,
            },
        )
    }

    proptest! {
        #[test]
        fn proptest_inline_joint_packets(
            records in proptest::collection::vec(inline_joint_strategy(), 0..=MAX_INLINE_JOINTS),
            sequence_id in any::<u16>(),
            mac in any::<u32>(),
        ) {
            let mut packet = WrcPacket::with_payload(WrcPayload::InlineJointData(records));
            packet.set_sequence_id(sequence_id);
            packet.set_mac(mac);

            let decoded = WrcPacket::decode(&packet.encode()).unwrap();
            prop_assert_eq!(decoded, packet);
        }
    }
}
