use std::fmt::Write as _;

use serialport::{SerialPortInfo, SerialPortType, UsbPortInfo};
use tracing::trace;

use crate::error::{PortError, Result};

/// A serial port visible on this host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortInfo {
    /// Name used to open the port (e.g. `/dev/ttyUSB0`, `COM3`).
    pub port_name: String,
    /// What the operating system knows about the device.
    pub description: String,
}

impl PortInfo {
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
        }
    }
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let description = describe_port_type(&info.port_type);
        Self::new(info.port_name, description)
    }
}

/// Source of the current serial port list.
///
/// Implemented by [`SystemEnumerator`] for real hosts; tests and embedders
/// can supply their own.
pub trait PortEnumerator {
    /// Ports present right now. Order is not significant.
    fn available_ports(&self) -> Result<Vec<PortInfo>>;
}

impl<E: PortEnumerator + ?Sized> PortEnumerator for &E {
    fn available_ports(&self) -> Result<Vec<PortInfo>> {
        (**self).available_ports()
    }
}

/// Lists the ports reported by `serialport::available_ports`, sorted by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnumerator;

impl PortEnumerator for SystemEnumerator {
    fn available_ports(&self) -> Result<Vec<PortInfo>> {
        let mut ports: Vec<PortInfo> = serialport::available_ports()
            .map_err(PortError::Enumerate)?
            .into_iter()
            .map(PortInfo::from)
            .collect();
        ports.sort();
        trace!(count = ports.len(), "enumerated serial ports");
        Ok(ports)
    }
}

/// Human-readable description of a port, e.g.
/// `USB 0403:6001 FTDI FT232R USB UART (serial A10K5XYZ)`.
pub fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => describe_usb(usb),
        SerialPortType::PciPort => "PCI serial port".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth serial port".to_string(),
        SerialPortType::Unknown => "serial port".to_string(),
    }
}

fn describe_usb(usb: &UsbPortInfo) -> String {
    let mut text = format!("USB {:04x}:{:04x}", usb.vid, usb.pid);
    for part in [usb.manufacturer.as_deref(), usb.product.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
    {
        text.push(' ');
        text.push_str(part);
    }
    if let Some(serial) = usb.serial_number.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(text, " (serial {serial})");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ftdi() -> UsbPortInfo {
        UsbPortInfo {
            vid: 0x0403,
            pid: 0x6001,
            serial_number: Some("A10K5XYZ".to_string()),
            manufacturer: Some("FTDI".to_string()),
            product: Some("FT232R USB UART".to_string()),
        }
    }

    #[test]
    fn usb_ports_are_described_by_identity() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyUSB0".to_string(),
            port_type: SerialPortType::UsbPort(ftdi()),
        };
        let port = PortInfo::from(info);
        assert_eq!(port.port_name, "/dev/ttyUSB0");
        assert_eq!(
            port.description,
            "USB 0403:6001 FTDI FT232R USB UART (serial A10K5XYZ)"
        );
    }

    #[test]
    fn missing_usb_strings_are_skipped() {
        let usb = UsbPortInfo {
            serial_number: None,
            manufacturer: Some(String::new()),
            product: None,
            ..ftdi()
        };
        assert_eq!(
            describe_port_type(&SerialPortType::UsbPort(usb)),
            "USB 0403:6001"
        );
    }

    #[test]
    fn other_port_types() {
        assert_eq!(
            describe_port_type(&SerialPortType::BluetoothPort),
            "Bluetooth serial port"
        );
        assert_eq!(describe_port_type(&SerialPortType::PciPort), "PCI serial port");
        assert_eq!(describe_port_type(&SerialPortType::Unknown), "serial port");
    }

    #[test]
    fn ports_order_by_name() {
        let mut ports = vec![
            PortInfo::new("/dev/ttyUSB1", "serial port"),
            PortInfo::new("/dev/ttyACM0", "serial port"),
        ];
        ports.sort();
        assert_eq!(ports[0].port_name, "/dev/ttyACM0");
    }
}
