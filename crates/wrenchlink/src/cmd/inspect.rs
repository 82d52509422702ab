use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};
use wrenchlink_frame::{Frame, FrameConfig, FrameError, FrameReader};
use wrenchlink_packet::{PacketError, UsbLocalPacket, WirePacket, WrcPacket, USB_BODY_SIZE, WRC_BODY_SIZE};
use wrenchlink_port::{PortConfig, SerialPort};

use crate::cmd::packet::{usb_view, wrc_view};
use crate::cmd::{cancel_on_ctrlc, InspectArgs, PacketKind};
use crate::exit::{frame_error, io_error, port_error, CliResult, SUCCESS};
use crate::hex::format_hex;
use crate::output::{print_record, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let port_config = PortConfig {
        baud_rate: args.baud,
        read_timeout: Duration::from_millis(args.read_timeout_ms),
        ..PortConfig::default()
    };
    let stream = open_stream(&args.path, &port_config)?;
    let frame_config = FrameConfig {
        max_frame_size: args.max_frame,
    };
    let mut reader = FrameReader::with_config(stream, frame_config);

    let token = cancel_on_ctrlc()?;
    let mut printed = 0usize;

    while !token.is_cancelled() {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) => {
                debug!(pending = reader.pending(), "end of stream");
                break;
            }
            Err(FrameError::Io(err)) if err.kind() == io::ErrorKind::TimedOut => continue,
            Err(err @ FrameError::FrameTooLarge { .. }) => {
                warn!(error = %err, "dropping oversized frame");
                continue;
            }
            Err(err) => return Err(frame_error("read failed", err)),
        };

        match describe_frame(&frame, args.kind) {
            Ok(record) => print_record(&record, format),
            Err(err) => {
                warn!(error = %err, body = %format_hex(&frame.payload), "skipping malformed packet");
                continue;
            }
        }

        printed = printed.saturating_add(1);
        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
    }

    info!(packets = printed, "inspect finished");
    Ok(SUCCESS)
}

fn open_stream(path: &Path, config: &PortConfig) -> CliResult<Box<dyn Read>> {
    if path.is_file() {
        let file = std::fs::File::open(path)
            .map_err(|err| io_error(&format!("cannot open {}", path.display()), err))?;
        debug!(path = %path.display(), "reading capture file");
        return Ok(Box::new(file));
    }

    let port = SerialPort::open(&path.to_string_lossy(), config)
        .map_err(|err| port_error("cannot open port", err))?;
    Ok(Box::new(port))
}

fn describe_frame(frame: &Frame, kind: PacketKind) -> Result<serde_json::Value, PacketError> {
    let body = frame.payload.as_ref();
    let kind = match kind {
        PacketKind::Auto => match body.len() {
            USB_BODY_SIZE => PacketKind::Usb,
            WRC_BODY_SIZE => PacketKind::Wrc,
            len => {
                debug!(len, "frame size matches no packet family");
                return Ok(json!({
                    "family": "raw",
                    "len": len,
                    "body": format_hex(body),
                }));
            }
        },
        explicit => explicit,
    };

    match kind {
        PacketKind::Usb => Ok(usb_view(&UsbLocalPacket::from_body(body)?)),
        _ => Ok(wrc_view(&WrcPacket::from_body(body)?)),
    }
}

#[cfg(test)]
mod tests {
    use wrenchlink_packet::WrcPayload;

    use super::*;

    #[test]
    fn auto_detects_family_by_body_size() {
        let usb = Frame::new(UsbLocalPacket::default().to_body());
        let wrc = Frame::new(WrcPacket::with_payload(WrcPayload::Beep).to_body());
        let odd = Frame::new(vec![0xCA, 0xFE]);

        assert_eq!(describe_frame(&usb, PacketKind::Auto).unwrap()["family"], "usb");
        assert_eq!(describe_frame(&wrc, PacketKind::Auto).unwrap()["kind"], "Beep");
        assert_eq!(describe_frame(&odd, PacketKind::Auto).unwrap()["body"], "CA FE");
    }

    #[test]
    fn explicit_family_rejects_short_body() {
        let usb = Frame::new(UsbLocalPacket::default().to_body());
        let err = describe_frame(&usb, PacketKind::Wrc).unwrap_err();
        assert!(matches!(err, PacketError::Truncated { expected: 248, actual: 12 }));
    }
}
