/// Errors that can occur while discovering or opening serial ports.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Listing the available ports failed.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),

    /// Opening or configuring the port failed.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// An I/O error occurred on an open port.
    #[error("port I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PortError>;
