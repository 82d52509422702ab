mod cmd;
mod exit;
mod hex;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "wrenchlink", version, about = "SM7Bit framing and torque-wrench packet tool")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "WRENCHLINK_LOG",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{PacketCommand, PacketKind, UsbAction, UsbBuild, WrcAction, WrcBuild};

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from(["wrenchlink", "encode", "CAFEBABE"])
            .expect("encode args should parse");
        match cli.command {
            Command::Encode(args) => assert_eq!(args.hex.as_deref(), Some("CAFEBABE")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_hex_and_file_together() {
        let err = Cli::try_parse_from(["wrenchlink", "decode", "00CB02", "--file", "/tmp/x.bin"])
            .expect_err("conflicting args should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn requires_some_input() {
        let err = Cli::try_parse_from(["wrenchlink", "encode"]).expect_err("input is required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_nested_packet_build() {
        let cli = Cli::try_parse_from([
            "wrenchlink",
            "packet",
            "usb",
            "build",
            "rf-status",
            "--rssi",
            "-80",
        ])
        .expect("usb build should parse");
        assert!(matches!(
            cli.command,
            Command::Packet(PacketCommand::Usb {
                action: UsbAction::Build(UsbBuild::RfStatus { rssi: -80, .. })
            })
        ));

        let cli = Cli::try_parse_from([
            "wrenchlink", "packet", "wrc", "build", "--mac", "0xDEADBEEF", "beep",
        ])
        .expect("wrc build should parse");
        match cli.command {
            Command::Packet(PacketCommand::Wrc {
                action: WrcAction::Build(args),
            }) => {
                assert_eq!(args.mac, 0xDEAD_BEEF);
                assert!(matches!(args.command, WrcBuild::Beep));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_inspect_with_global_flags() {
        let cli = Cli::try_parse_from([
            "wrenchlink",
            "inspect",
            "/dev/ttyUSB0",
            "--kind",
            "wrc",
            "--count",
            "3",
            "--format",
            "json",
        ])
        .expect("inspect args should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        match cli.command {
            Command::Inspect(args) => {
                assert_eq!(args.kind, PacketKind::Wrc);
                assert_eq!(args.count, Some(3));
                assert_eq!(args.baud, 115_200);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
