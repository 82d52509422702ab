use std::time::Duration;

/// Line and polling settings for serial links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfig {
    /// Line speed in baud.
    pub baud_rate: u32,
    /// How long a read waits for bytes before reporting a timeout.
    pub read_timeout: Duration,
    /// Delay between two enumerations in [`crate::PortWatcher::watch`].
    pub poll_interval: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            read_timeout: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(1000),
        }
    }
}
