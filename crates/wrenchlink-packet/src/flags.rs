//! Bit-packed single-byte fields.
//!
//! Sub-fields are packed low-to-high in declaration order, matching the
//! firmware's C bit-fields. Setters mask values to the field width; they
//! never reject.
//!
//! ```text
//! WrcFlags          bit 0 direction | bit 1 variable_len | bits 2-7 type
//! EnergyFlags       bit 0 charging  | bit 1 hibernated   | bit 2 power_connected
//! InfoRequest       bit 0 serial | 1 generic | 2 energy | 3 timing | 4 network
//! JointFlags        bit 0 valid | bit 1 ok | 2-3 mode | 4-5 method | 6-7 unit
//! JointConfigFlags  bits 0-1 reserved     | 2-3 mode | 4-5 method | 6-7 unit
//! ```

use bitfield::bitfield;
use bitflags::bitflags;

use crate::joint::{JointMethod, JointMode, JointUnit};

bitfield! {
    /// Flags byte of the WRC header.
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
    pub struct WrcFlags(u8);
    impl Debug;
    u8;
    /// Direction bit (0 or 1).
    pub direction, set_direction: 0, 0;
    /// Variable-length bit (0 or 1).
    pub variable_len, set_variable_len: 1, 1;
    /// Packet type (0-63); wider values are truncated to 6 bits.
    pub packet_type, set_packet_type: 7, 2;
}

impl WrcFlags {
    /// Mask of the 6-bit packet type.
    pub const TYPE_MASK: u8 = 0x3F;

    pub fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub fn as_byte(&self) -> u8 {
        self.0
    }
}

bitflags! {
    /// Power state reported by `InfoEnergy`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EnergyFlags: u8 {
        const CHARGING = 1 << 0;
        const HIBERNATED = 1 << 1;
        const POWER_CONNECTED = 1 << 2;

        // Spare firmware bits survive a decode and re-encode.
        const _ = !0;
    }
}

impl EnergyFlags {
    pub fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }

    pub fn as_byte(&self) -> u8 {
        self.bits()
    }

    pub fn charging(&self) -> bool {
        self.contains(Self::CHARGING)
    }

    pub fn set_charging(&mut self, on: bool) {
        self.set(Self::CHARGING, on);
    }

    pub fn hibernated(&self) -> bool {
        self.contains(Self::HIBERNATED)
    }

    pub fn set_hibernated(&mut self, on: bool) {
        self.set(Self::HIBERNATED, on);
    }

    pub fn power_connected(&self) -> bool {
        self.contains(Self::POWER_CONNECTED)
    }

    pub fn set_power_connected(&mut self, on: bool) {
        self.set(Self::POWER_CONNECTED, on);
    }
}

bitflags! {
    /// Which info reports a `GetInfo` command asks for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InfoRequest: u8 {
        const SERIAL = 1 << 0;
        const GENERIC = 1 << 1;
        const ENERGY = 1 << 2;
        const TIMING = 1 << 3;
        const NETWORK = 1 << 4;

        const _ = !0;
    }
}

impl InfoRequest {
    pub fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }

    pub fn as_byte(&self) -> u8 {
        self.bits()
    }

    pub fn serial(&self) -> bool {
        self.contains(Self::SERIAL)
    }

    pub fn generic(&self) -> bool {
        self.contains(Self::GENERIC)
    }

    pub fn energy(&self) -> bool {
        self.contains(Self::ENERGY)
    }

    pub fn timing(&self) -> bool {
        self.contains(Self::TIMING)
    }

    pub fn network(&self) -> bool {
        self.contains(Self::NETWORK)
    }
}

// Plain bytes on the wire and in reports, not flag-name strings.
#[cfg(feature = "serde")]
impl serde::Serialize for EnergyFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for InfoRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

bitfield! {
    /// Flags byte of a joint measurement record.
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
    pub struct JointFlags(u8);
    impl Debug;
    u8;
    /// The record holds a real measurement.
    pub valid, set_valid: 0;
    /// The joint landed inside its tolerances.
    pub ok, set_ok: 1;
    mode_bits, set_mode_bits: 3, 2;
    method_bits, set_method_bits: 5, 4;
    unit_bits, set_unit_bits: 7, 6;
}

impl JointFlags {
    pub fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub fn as_byte(&self) -> u8 {
        self.0
    }

    pub fn mode(&self) -> JointMode {
        JointMode::from_bits(self.mode_bits())
    }

    pub fn set_mode(&mut self, mode: JointMode) {
        self.set_mode_bits(mode as u8);
    }

    pub fn method(&self) -> Option<JointMethod> {
        JointMethod::from_bits(self.method_bits())
    }

    pub fn set_method(&mut self, method: JointMethod) {
        self.set_method_bits(method as u8);
    }

    pub fn unit(&self) -> Option<JointUnit> {
        JointUnit::from_bits(self.unit_bits())
    }

    pub fn set_unit(&mut self, unit: JointUnit) {
        self.set_unit_bits(unit as u8);
    }
}

bitfield! {
    /// Flags byte of a `SetJoint` command.
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
    pub struct JointConfigFlags(u8);
    impl Debug;
    u8;
    /// Reserved low bits, kept so unknown firmware values survive a re-encode.
    pub reserved, _: 1, 0;
    mode_bits, set_mode_bits: 3, 2;
    method_bits, set_method_bits: 5, 4;
    unit_bits, set_unit_bits: 7, 6;
}

impl JointConfigFlags {
    pub fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub fn as_byte(&self) -> u8 {
        self.0
    }

    pub fn mode(&self) -> JointMode {
        JointMode::from_bits(self.mode_bits())
    }

    pub fn set_mode(&mut self, mode: JointMode) {
        self.set_mode_bits(mode as u8);
    }

    pub fn method(&self) -> Option<JointMethod> {
        JointMethod::from_bits(self.method_bits())
    }

    pub fn set_method(&mut self, method: JointMethod) {
        self.set_method_bits(method as u8);
    }

    pub fn unit(&self) -> Option<JointUnit> {
        JointUnit::from_bits(self.unit_bits())
    }

    pub fn set_unit(&mut self, unit: JointUnit) {
        self.set_unit_bits(unit as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrc_flags_layout() {
        let mut flags = WrcFlags::default();
        flags.set_direction(1);
        flags.set_variable_len(1);
        flags.set_packet_type(15);
        assert_eq!(flags.as_byte(), 0b0011_1111);
        assert_eq!(flags.packet_type(), 15);
    }

    #[test]
    fn wrc_flags_truncate_out_of_range() {
        let mut flags = WrcFlags::default();
        flags.set_packet_type(0x41);
        assert_eq!(flags.packet_type(), 0x01);
        flags.set_direction(2);
        assert_eq!(flags.direction(), 0);
        flags.set_variable_len(0xFF);
        assert_eq!(flags.variable_len(), 1);
        assert_eq!(flags.packet_type(), 0x01);
        assert_eq!(flags.as_byte(), 0b0000_0110);
    }

    #[test]
    fn wrc_flags_of_server_info_query() {
        // GetInfo (6) sent from the server: 6 << 2 | 1.
        let flags = WrcFlags::from_byte(25);
        assert_eq!(flags.direction(), 1);
        assert_eq!(flags.variable_len(), 0);
        assert_eq!(flags.packet_type(), 6);
    }

    #[test]
    fn joint_flags_fields() {
        let mut flags = JointFlags::default();
        flags.set_valid(true);
        flags.set_mode(JointMode::TorqueAngle);
        flags.set_method(JointMethod::Peak);
        flags.set_unit(JointUnit::FtLb);
        assert_eq!(flags.as_byte(), 0b1001_1001);
        assert!(flags.valid());
        assert!(!flags.ok());
        assert_eq!(flags.mode(), JointMode::TorqueAngle);
        assert_eq!(flags.method(), Some(JointMethod::Peak));
        assert_eq!(flags.unit(), Some(JointUnit::FtLb));
    }

    #[test]
    fn joint_config_keeps_reserved_bits() {
        let mut flags = JointConfigFlags::from_byte(0b0000_0011);
        flags.set_unit(JointUnit::InLb);
        assert_eq!(flags.reserved(), 3);
        assert_eq!(flags.as_byte(), 0b0100_0011);
        assert_eq!(JointConfigFlags::from_byte(0xC0).unit(), None);
    }

    #[test]
    fn info_request_bits() {
        let request = InfoRequest::SERIAL | InfoRequest::NETWORK;
        assert_eq!(request.as_byte(), 0b0001_0001);
        assert!(request.serial());
        assert!(request.network());
        assert!(!request.timing());
    }

    #[test]
    fn unknown_bits_are_retained() {
        assert_eq!(InfoRequest::from_byte(0xE1).as_byte(), 0xE1);
        assert!(InfoRequest::from_byte(0xE1).serial());
        let mut energy = EnergyFlags::from_byte(0b1000_0000);
        energy.set_hibernated(true);
        assert_eq!(energy.as_byte(), 0b1000_0010);
    }

    #[test]
    fn energy_flags_bits() {
        let mut flags = EnergyFlags::default();
        flags.set_power_connected(true);
        flags.set_charging(true);
        assert_eq!(flags.as_byte(), 0b101);
        flags.set_charging(false);
        assert!(!flags.charging());
        assert!(!flags.hibernated());
        assert!(flags.power_connected());
    }
}
