use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use wrenchlink_port::CancellationToken;

use crate::exit::{io_error, CliError, CliResult, INTERNAL};
use crate::hex::parse_hex;
use crate::output::OutputFormat;

pub mod codec;
pub mod inspect;
pub mod packet;
pub mod ports;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame raw bytes with SM7Bit stuffing.
    Encode(BytesArgs),
    /// Recover raw bytes from an SM7Bit frame.
    Decode(BytesArgs),
    /// Decode or build USB-local and WRC packets.
    #[command(subcommand)]
    Packet(PacketCommand),
    /// Read a serial device or capture file and print each packet.
    Inspect(InspectArgs),
    /// List serial ports, optionally watching for hot-plug changes.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => codec::run_encode(args, format),
        Command::Decode(args) => codec::run_decode(args, format),
        Command::Packet(command) => packet::run(command, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct BytesArgs {
    /// Input bytes as hex (e.g. "CAFEBABE", "00 CB 7F").
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read input bytes from a file instead.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl BytesArgs {
    pub fn load(&self) -> CliResult<Vec<u8>> {
        match (&self.hex, &self.file) {
            (Some(hex), _) => parse_hex_arg(hex),
            (None, Some(path)) => std::fs::read(path)
                .map_err(|err| io_error(&format!("failed to read {}", path.display()), err)),
            (None, None) => Err(CliError::new(crate::exit::USAGE, "no input given")),
        }
    }
}

pub fn parse_hex_arg(hex: &str) -> CliResult<Vec<u8>> {
    parse_hex(hex).map_err(|msg| CliError::new(crate::exit::DATA_INVALID, msg))
}

#[derive(Subcommand, Debug)]
pub enum PacketCommand {
    /// USB-local packets (host <-> dongle).
    Usb {
        #[command(subcommand)]
        action: UsbAction,
    },
    /// WRC packets (wrench <-> controller).
    Wrc {
        #[command(subcommand)]
        action: WrcAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsbAction {
    /// Decode a framed packet and print its fields.
    Decode(PacketDecodeArgs),
    /// Build a packet and print it framed.
    #[command(subcommand)]
    Build(UsbBuild),
}

#[derive(Args, Debug)]
pub struct PacketDecodeArgs {
    /// Framed packet as hex.
    pub hex: String,
    /// Zero-pad short bodies and fall back to an empty packet instead of failing.
    #[arg(long)]
    pub lossy: bool,
}

#[derive(Subcommand, Debug)]
pub enum UsbBuild {
    /// Packet with no payload.
    Empty,
    /// Radio link quality report.
    RfStatus {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        rssi: i8,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        snr: i8,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        rscp: i8,
    },
    /// Radio configuration.
    RfControl {
        #[arg(long)]
        freq_hz: u32,
        #[arg(long, default_value_t = 14)]
        txpower: u8,
        #[arg(long, default_value_t = 7)]
        sf: u8,
        #[arg(long, default_value_t = 0)]
        bw: u8,
        #[arg(long, default_value_t = 1)]
        cr: u8,
        #[arg(long, default_value_t = 0)]
        ldro: u8,
    },
    /// MAC mode (debugging only).
    MacMode {
        #[arg(long)]
        mode: u8,
    },
}

#[derive(Subcommand, Debug)]
pub enum WrcAction {
    /// Decode a framed packet and print its fields.
    Decode(PacketDecodeArgs),
    /// Build a packet and print it framed.
    Build(WrcBuildArgs),
}

#[derive(Args, Debug)]
pub struct WrcBuildArgs {
    /// Sequence id of the packet.
    #[arg(long, default_value_t = 0)]
    pub seq: u16,
    /// Session id of the target wrench (decimal or 0x-prefixed hex).
    #[arg(long, default_value = "0", value_parser = parse_u32)]
    pub mac: u32,
    /// Mark the packet as sent by the wrench instead of the controller.
    #[arg(long)]
    pub from_client: bool,
    #[command(subcommand)]
    pub command: WrcBuild,
}

#[derive(Subcommand, Debug)]
pub enum WrcBuild {
    /// Ask the wrench for info reports.
    GetInfo {
        #[arg(long)]
        serial: bool,
        #[arg(long)]
        generic: bool,
        #[arg(long)]
        energy: bool,
        #[arg(long)]
        timing: bool,
        #[arg(long)]
        network: bool,
    },
    /// Configure the next joint.
    SetJoint(SetJointArgs),
    /// Set the wrench clock (defaults to now).
    SetWrenchTime {
        #[arg(long)]
        unix_time: Option<u32>,
    },
    /// Request stored joints.
    GetJointData {
        #[arg(long, default_value_t = 0)]
        start: u16,
        #[arg(long, default_value_t = 1)]
        count: u8,
    },
    /// Delete stored joints.
    ClearJointData,
    /// Request a status report.
    GetStatusReport,
    /// Make the wrench beep.
    Beep,
}

#[derive(Args, Debug)]
pub struct SetJointArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub torque: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub torque_angle_start: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub torque_upper_tol: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub torque_lower_tol: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub angle: i16,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub angle_upper_tol: i16,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub angle_lower_tol: i16,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub fdt: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub fda: i16,
    #[arg(long, default_value_t = 1)]
    pub repeat: u16,
    #[arg(long, default_value_t = 0)]
    pub task_id: u16,
    #[arg(long, value_enum, default_value = "torque")]
    pub mode: ModeArg,
    #[arg(long, value_enum, default_value = "click")]
    pub method: MethodArg,
    #[arg(long, value_enum, default_value = "nm")]
    pub unit: UnitArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ModeArg {
    Torque,
    Angle,
    TorqueAngle,
    AngleTorque,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum MethodArg {
    Click,
    Peak,
    Track,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum UnitArg {
    Nm,
    InLb,
    FtLb,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PacketKind {
    /// Pick by decoded body size; unknown sizes are printed raw.
    #[default]
    Auto,
    Usb,
    Wrc,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Serial device or capture file to read.
    pub path: PathBuf,
    /// Packet family carried by the stream.
    #[arg(long, value_enum, default_value = "auto")]
    pub kind: PacketKind,
    /// Exit after printing N packets.
    #[arg(long)]
    pub count: Option<usize>,
    /// Line speed when `path` is a serial port.
    #[arg(long, default_value_t = 115_200, env = "WRENCHLINK_BAUD")]
    pub baud: u32,
    /// Read timeout in milliseconds when `path` is a serial port.
    #[arg(long, default_value_t = 1000)]
    pub read_timeout_ms: u64,
    /// Largest accepted frame in bytes.
    #[arg(long, default_value_t = wrenchlink_frame::DEFAULT_MAX_FRAME)]
    pub max_frame: usize,
}

#[derive(Args, Debug)]
pub struct PortsArgs {
    /// Keep running and report ports as they appear and disappear.
    #[arg(long)]
    pub watch: bool,
    /// Delay between scans when watching, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub poll_interval_ms: u64,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_u32(value: &str) -> Result<u32, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|err| format!("invalid number `{value}`: {err}"))
}

/// Token cancelled on the first Ctrl-C.
pub fn cancel_on_ctrlc() -> CliResult<CancellationToken> {
    let token = CancellationToken::new();
    let handle = token.clone();
    ctrlc::set_handler(move || handle.cancel()).map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })?;
    Ok(token)
}
