use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::PortConfig;
use crate::enumerate::{PortEnumerator, PortInfo};
use crate::error::Result;

// Upper bound on how long a cancelled watch keeps sleeping.
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// A change in the set of available ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortEvent {
    Added(PortInfo),
    Removed(PortInfo),
}

impl PortEvent {
    pub fn port(&self) -> &PortInfo {
        match self {
            Self::Added(port) | Self::Removed(port) => port,
        }
    }
}

/// Tracks the port list between enumerations and reports the difference.
///
/// The first poll reports every present port as added.
pub struct PortWatcher<E> {
    enumerator: E,
    known: BTreeMap<String, PortInfo>,
    poll_interval: Duration,
}

impl<E: PortEnumerator> PortWatcher<E> {
    pub fn new(enumerator: E) -> Self {
        Self::with_config(enumerator, &PortConfig::default())
    }

    pub fn with_config(enumerator: E, config: &PortConfig) -> Self {
        Self {
            enumerator,
            known: BTreeMap::new(),
            poll_interval: config.poll_interval,
        }
    }

    /// Enumerate once and return what changed since the previous call.
    ///
    /// Removals come before additions, each sorted by port name.
    pub fn poll(&mut self) -> Result<Vec<PortEvent>> {
        let current: BTreeMap<String, PortInfo> = self
            .enumerator
            .available_ports()?
            .into_iter()
            .map(|port| (port.port_name.clone(), port))
            .collect();

        let mut events = Vec::new();
        for (name, port) in &self.known {
            if !current.contains_key(name) {
                debug!(port = %name, "port removed");
                events.push(PortEvent::Removed(port.clone()));
            }
        }
        for (name, port) in &current {
            if !self.known.contains_key(name) {
                debug!(port = %name, "new port");
                events.push(PortEvent::Added(port.clone()));
            }
        }

        self.known = current;
        Ok(events)
    }

    /// Poll every `poll_interval` until `token` is cancelled, handing each
    /// change to `on_event`.
    ///
    /// Enumeration failures end the loop.
    pub fn watch<F>(&mut self, token: &CancellationToken, mut on_event: F) -> Result<()>
    where
        F: FnMut(PortEvent),
    {
        while !token.is_cancelled() {
            for event in self.poll()? {
                on_event(event);
            }
            sleep_unless_cancelled(token, self.poll_interval);
        }
        debug!("port watch cancelled");
        Ok(())
    }

    /// Ports seen by the last poll, sorted by name.
    pub fn known_ports(&self) -> impl Iterator<Item = &PortInfo> {
        self.known.values()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn enumerator(&self) -> &E {
        &self.enumerator
    }
}

fn sleep_unless_cancelled(token: &CancellationToken, duration: Duration) {
    let deadline = Instant::now() + duration;
    while !token.is_cancelled() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep((deadline - now).min(CANCEL_CHECK_INTERVAL));
    }
}
