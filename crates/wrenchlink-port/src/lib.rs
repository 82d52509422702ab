//! Serial port boundary for torque-wrench links.
//!
//! - [`PortEnumerator`] lists ports; [`SystemEnumerator`] asks the
//!   operating system through `serialport`.
//! - [`PortWatcher`] diffs successive listings into [`PortEvent`]s, either
//!   on demand or in a loop stopped by a `CancellationToken`.
//! - [`SerialPort`] opens a device at 8N1 without flow control as a
//!   `Read + Write` stream for the frame reader and writer.

pub mod config;
pub mod enumerate;
pub mod error;
pub mod serial;
pub mod watcher;

pub use config::PortConfig;
pub use enumerate::{describe_port_type, PortEnumerator, PortInfo, SystemEnumerator};
pub use error::{PortError, Result};
pub use serial::SerialPort;
pub use serialport::{Error as SerialError, ErrorKind as SerialErrorKind};
pub use tokio_util::sync::CancellationToken;
pub use watcher::{PortEvent, PortWatcher};
