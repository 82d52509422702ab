//! USB-local control packets (local debug/control over the wired link).
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0x00    1B    type
//! 0x01    1B    payload_len
//! 0x02    10B   payload (sized to RfControl, zero-filled)
//! ```

use bytes::{Buf, BufMut};

use crate::wire::WirePacket;

/// Size of the payload area (the largest variant, `RfControl`).
pub const USB_PAYLOAD_SIZE: usize = 10;

/// Size of the full packet body.
pub const USB_BODY_SIZE: usize = 2 + USB_PAYLOAD_SIZE;

/// Discriminants of the `type` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum UsbLocalPacketType {
    Unknown = 0,
    RfStatus = 1,
    RfControl = 2,
    /// MAC mode, normally left alone outside debugging.
    MacMode = 3,
}

impl UsbLocalPacketType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::RfStatus),
            2 => Some(Self::RfControl),
            3 => Some(Self::MacMode),
            _ => None,
        }
    }
}

/// Radio link quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RfStatus {
    pub rssi: i8,
    pub snr: i8,
    /// Despread signal strength (LoRa).
    pub rscp: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LoraParams {
    pub sf: u8,
    pub bw: u8,
    pub cr: u8,
    pub ldro: u8,
}

/// Radio configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RfControl {
    pub freq_hz: u32,
    pub rsvd: u8,
    /// Transmit power in dBm; may be ignored by modules with an external PA.
    pub txpower: u8,
    pub lora: LoraParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MacMode {
    pub mode: u8,
}

/// Active payload variant of a USB-local packet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "fields", rename_all = "kebab-case"))]
pub enum UsbLocalPayload {
    /// No payload (type `Unknown`, length 0).
    #[default]
    None,
    RfStatus(RfStatus),
    RfControl(RfControl),
    MacMode(MacMode),
    /// Bytes of a type without a known layout.
    Raw(Vec<u8>),
}

impl UsbLocalPayload {
    /// The `type` value this variant is sent with; `None` for raw bytes.
    pub fn packet_type(&self) -> Option<UsbLocalPacketType> {
        match self {
            Self::None => Some(UsbLocalPacketType::Unknown),
            Self::RfStatus(_) => Some(UsbLocalPacketType::RfStatus),
            Self::RfControl(_) => Some(UsbLocalPacketType::RfControl),
            Self::MacMode(_) => Some(UsbLocalPacketType::MacMode),
            Self::Raw(_) => None,
        }
    }

    /// Bytes this variant occupies on the wire.
    pub fn wire_len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::RfStatus(_) => 3,
            Self::RfControl(_) => 10,
            Self::MacMode(_) => 1,
            Self::Raw(bytes) => bytes.len().min(USB_PAYLOAD_SIZE),
        }
    }

    fn write_to(&self, dst: &mut Vec<u8>) {
        match self {
            Self::None => {}
            Self::RfStatus(status) => {
                dst.put_i8(status.rssi);
                dst.put_i8(status.snr);
                dst.put_i8(status.rscp);
            }
            Self::RfControl(control) => {
                dst.put_u32_le(control.freq_hz);
                dst.put_u8(control.rsvd);
                dst.put_u8(control.txpower);
                dst.put_u8(control.lora.sf);
                dst.put_u8(control.lora.bw);
                dst.put_u8(control.lora.cr);
                dst.put_u8(control.lora.ldro);
            }
            Self::MacMode(mac) => dst.put_u8(mac.mode),
            Self::Raw(bytes) => dst.put_slice(&bytes[..self.wire_len()]),
        }
    }

    // `src` is the whole payload area.
    fn parse(packet_type: u8, payload_len: u8, mut src: &[u8]) -> Self {
        match UsbLocalPacketType::from_u8(packet_type) {
            Some(UsbLocalPacketType::RfStatus) => Self::RfStatus(RfStatus {
                rssi: src.get_i8(),
                snr: src.get_i8(),
                rscp: src.get_i8(),
            }),
            Some(UsbLocalPacketType::RfControl) => Self::RfControl(RfControl {
                freq_hz: src.get_u32_le(),
                rsvd: src.get_u8(),
                txpower: src.get_u8(),
                lora: LoraParams {
                    sf: src.get_u8(),
                    bw: src.get_u8(),
                    cr: src.get_u8(),
                    ldro: src.get_u8(),
                },
            }),
            Some(UsbLocalPacketType::MacMode) => Self::MacMode(MacMode { mode: src.get_u8() }),
            Some(UsbLocalPacketType::Unknown) | None => {
                if payload_len == 0 && packet_type == 0 {
                    Self::None
                } else {
                    Self::Raw(src[..usize::from(payload_len)].to_vec())
                }
            }
        }
    }
}

/// A USB-local packet, framed with SM7Bit on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UsbLocalPacket {
    packet_type: u8,
    payload_len: u8,
    payload: UsbLocalPayload,
}

impl UsbLocalPacket {
    /// Build a packet whose type and length follow the payload variant.
    ///
    /// `Raw` payloads keep type `Unknown`; set it with [`Self::set_packet_type`].
    pub fn with_payload(payload: UsbLocalPayload) -> Self {
        let mut packet = Self::default();
        packet.set_payload(payload);
        packet
    }

    pub fn packet_type(&self) -> u8 {
        self.packet_type
    }

    /// Set the type byte; the payload bytes are re-read as the new type.
    pub fn set_packet_type(&mut self, packet_type: u8) {
        self.packet_type = packet_type;
        self.reinterpret();
    }

    /// The `type` byte as a known discriminant.
    pub fn kind(&self) -> Option<UsbLocalPacketType> {
        UsbLocalPacketType::from_u8(self.packet_type)
    }

    pub fn payload_len(&self) -> u8 {
        self.payload_len
    }

    /// Set the payload length, clamped to the payload area.
    pub fn set_payload_len(&mut self, payload_len: u8) {
        self.payload_len = payload_len.min(USB_PAYLOAD_SIZE as u8);
        self.reinterpret();
    }

    pub fn payload(&self) -> &UsbLocalPayload {
        &self.payload
    }

    /// Replace the payload and set type and length to match it. A `Raw`
    /// payload keeps the current type.
    pub fn set_payload(&mut self, payload: UsbLocalPayload) {
        if let Some(kind) = payload.packet_type() {
            self.packet_type = kind as u8;
        }
        self.payload_len = payload.wire_len() as u8;
        self.payload = payload;
        self.reinterpret();
    }

    fn reinterpret(&mut self) {
        let mut area = Vec::with_capacity(USB_PAYLOAD_SIZE);
        self.payload.write_to(&mut area);
        area.resize(USB_PAYLOAD_SIZE, 0);
        self.payload = UsbLocalPayload::parse(self.packet_type, self.payload_len, &area);
    }
}

impl WirePacket for UsbLocalPacket {
    const BODY_SIZE: usize = USB_BODY_SIZE;

    fn to_body(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(USB_BODY_SIZE);
        body.put_u8(self.packet_type);
        body.put_u8(self.payload_len);
        self.payload.write_to(&mut body);
        body.resize(USB_BODY_SIZE, 0);
        body
    }

    fn parse_body(mut body: &[u8]) -> Self {
        let packet_type = body.get_u8();
        let payload_len = body.get_u8().min(USB_PAYLOAD_SIZE as u8);
        let payload = UsbLocalPayload::parse(packet_type, payload_len, body);
        Self {
            packet_type,
            payload_len,
            payload,
        }
    }
}
