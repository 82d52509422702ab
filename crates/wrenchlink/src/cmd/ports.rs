use std::time::Duration;

use tracing::info;
use wrenchlink_port::{PortConfig, PortEnumerator, PortWatcher, SystemEnumerator};

use crate::cmd::{cancel_on_ctrlc, PortsArgs};
use crate::exit::{port_error, CliResult, SUCCESS};
use crate::output::{print_port_event, print_ports, OutputFormat};

pub fn run(args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let enumerator = SystemEnumerator;

    if !args.watch {
        let ports = enumerator
            .available_ports()
            .map_err(|err| port_error("list failed", err))?;
        print_ports(&ports, format);
        return Ok(SUCCESS);
    }

    let config = PortConfig {
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        ..PortConfig::default()
    };
    let mut watcher = PortWatcher::with_config(enumerator, &config);
    let token = cancel_on_ctrlc()?;

    info!(interval_ms = args.poll_interval_ms, "watching for serial ports");
    watcher
        .watch(&token, |event| print_port_event(&event, format))
        .map_err(|err| port_error("watch failed", err))?;

    Ok(SUCCESS)
}
