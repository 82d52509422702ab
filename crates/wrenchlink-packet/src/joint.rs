//! Enumerated value sets carried in bit-packed WRC fields.

/// How a joint is tightened (2-bit field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum JointMode {
    Torque = 0,
    Angle = 1,
    TorqueAngle = 2,
    AngleTorque = 3,
}

impl JointMode {
    /// Map a raw 2-bit value; only the low two bits are looked at.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Torque,
            1 => Self::Angle,
            2 => Self::TorqueAngle,
            _ => Self::AngleTorque,
        }
    }

    /// Label used by the wrench firmware.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Torque => "torque",
            Self::Angle => "angle",
            Self::TorqueAngle => "torque-angle",
            Self::AngleTorque => "angle-torque",
        }
    }
}

/// How the wrench decides a joint is done (2-bit field, value 3 undefined).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum JointMethod {
    Click = 0,
    Peak = 1,
    Track = 2,
}

impl JointMethod {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x03 {
            0 => Some(Self::Click),
            1 => Some(Self::Peak),
            2 => Some(Self::Track),
            _ => None,
        }
    }

    /// Label used by the wrench firmware.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "clic",
            Self::Peak => "peak",
            Self::Track => "trck",
        }
    }
}

/// Torque unit (2-bit field, value 3 undefined).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum JointUnit {
    Nm = 0,
    InLb = 1,
    FtLb = 2,
}

impl JointUnit {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x03 {
            0 => Some(Self::Nm),
            1 => Some(Self::InLb),
            2 => Some(Self::FtLb),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nm => "Nm",
            Self::InLb => "in lb",
            Self::FtLb => "ft lb",
        }
    }
}

/// Who sent a WRC packet (1-bit field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum Direction {
    /// Wrench to controller.
    #[default]
    FromClient = 0,
    /// Controller to wrench.
    FromServer = 1,
}

impl From<u8> for Direction {
    fn from(bit: u8) -> Self {
        if bit & 1 == 0 {
            Self::FromClient
        } else {
            Self::FromServer
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        direction as u8
    }
}

/// Status codes carried by a `StatusReport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u16)]
pub enum WrcStatus {
    None = 0,
    SetJointSuccess = 1,
    SetJointFailed = 2,
    JointsDeleted = 3,
    GetJointSuccess = 4,
    GetJointRangeError = 5,
}

impl WrcStatus {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::SetJointSuccess),
            2 => Some(Self::SetJointFailed),
            3 => Some(Self::JointsDeleted),
            4 => Some(Self::GetJointSuccess),
            5 => Some(Self::GetJointRangeError),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_covers_all_two_bit_values() {
        assert_eq!(JointMode::from_bits(0), JointMode::Torque);
        assert_eq!(JointMode::from_bits(3), JointMode::AngleTorque);
        assert_eq!(JointMode::from_bits(0x06), JointMode::TorqueAngle);
        assert_eq!(JointMode::TorqueAngle.as_str(), "torque-angle");
    }

    #[test]
    fn method_and_unit_reject_undefined_value() {
        assert_eq!(JointMethod::from_bits(2), Some(JointMethod::Track));
        assert_eq!(JointMethod::from_bits(3), None);
        assert_eq!(JointUnit::from_bits(1), Some(JointUnit::InLb));
        assert_eq!(JointUnit::from_bits(3), None);
    }

    #[test]
    fn direction_uses_low_bit() {
        assert_eq!(Direction::from(0), Direction::FromClient);
        assert_eq!(Direction::from(3), Direction::FromServer);
        assert_eq!(u8::from(Direction::FromServer), 1);
    }

    #[test]
    fn status_codes() {
        assert_eq!(WrcStatus::from_code(3), Some(WrcStatus::JointsDeleted));
        assert_eq!(WrcStatus::from_code(6), None);
    }
}
