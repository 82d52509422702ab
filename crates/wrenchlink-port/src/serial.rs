use std::fmt;
use std::io::{self, Read, Write};

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPortBuilder, StopBits};
use tracing::info;

use crate::config::PortConfig;
use crate::error::{PortError, Result};

/// A serial device opened at 8N1 without flow control.
///
/// Reads wait at most `read_timeout` and report
/// [`io::ErrorKind::TimedOut`] when nothing arrived, so a frame reader keeps
/// its buffered bytes and can retry.
pub struct SerialPort {
    inner: Box<dyn serialport::SerialPort>,
    name: String,
}

impl SerialPort {
    pub fn open(port_name: &str, config: &PortConfig) -> Result<Self> {
        let inner = builder(port_name, config)
            .open()
            .map_err(|source| PortError::Open {
                port: port_name.to_string(),
                source,
            })?;
        info!(port = port_name, baud = config.baud_rate, "opened serial port");
        Ok(Self {
            inner,
            name: port_name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Line speed currently applied by the driver.
    pub fn baud_rate(&self) -> Result<u32> {
        self.inner
            .baud_rate()
            .map_err(|err| PortError::Io(err.into()))
    }

    /// Drop bytes received but not yet read, e.g. before resynchronising.
    pub fn discard_input(&self) -> Result<()> {
        self.inner
            .clear(ClearBuffer::Input)
            .map_err(|err| PortError::Io(err.into()))
    }

    pub fn try_clone(&self) -> Result<Self> {
        let inner = self
            .inner
            .try_clone()
            .map_err(|err| PortError::Io(err.into()))?;
        Ok(Self {
            inner,
            name: self.name.clone(),
        })
    }
}

impl fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialPort")
            .field("name", &self.name)
            .field("timeout", &self.inner.timeout())
            .finish()
    }
}

impl Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn builder(port_name: &str, config: &PortConfig) -> SerialPortBuilder {
    serialport::new(port_name, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(config.read_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_reports_open_error() {
        let path = std::env::temp_dir().join("wrenchlink-port-no-such-tty");
        let err = SerialPort::open(&path.to_string_lossy(), &PortConfig::default()).unwrap_err();
        match err {
            PortError::Open { port, .. } => assert!(port.ends_with("wrenchlink-port-no-such-tty")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn regular_file_is_not_a_serial_port() {
        let path = std::env::temp_dir().join(format!(
            "wrenchlink-port-capture-{}.bin",
            std::process::id()
        ));
        std::fs::write(&path, [0x00, 0xCB, 0x02]).unwrap();

        let result = SerialPort::open(&path.to_string_lossy(), &PortConfig::default());
        assert!(matches!(result, Err(PortError::Open { .. })));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_error_names_the_port() {
        let err = PortError::Open {
            port: "COM7".to_string(),
            source: serialport::Error::new(serialport::ErrorKind::NoDevice, "not present"),
        };
        assert_eq!(err.to_string(), "failed to open COM7: not present");
    }
}
