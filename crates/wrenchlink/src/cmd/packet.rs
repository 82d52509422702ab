use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};
use wrenchlink_packet::{
    Direction, GetInfo, GetJointData, InfoRequest, JointConfigFlags, JointFlags, JointMethod,
    JointMode, JointUnit, LoraParams, MacMode, RfControl, RfStatus, SetJoint, SetWrenchTime,
    UsbLocalPacket, UsbLocalPayload, WirePacket, WrcPacket, WrcPayload, WrcStatus,
};

use crate::cmd::{
    parse_hex_arg, MethodArg, ModeArg, PacketCommand, PacketDecodeArgs, SetJointArgs, UnitArg,
    UsbAction, UsbBuild, WrcAction, WrcBuild, WrcBuildArgs,
};
use crate::exit::{packet_error, CliResult, SUCCESS};
use crate::hex::format_hex;
use crate::output::{print_record, OutputFormat};

pub fn run(command: PacketCommand, format: OutputFormat) -> CliResult<i32> {
    let record = match command {
        PacketCommand::Usb { action } => match action {
            UsbAction::Decode(args) => usb_view(&decode::<UsbLocalPacket>(&args)?),
            UsbAction::Build(build) => {
                let packet = build_usb(build);
                with_framed(usb_view(&packet), &packet.encode())
            }
        },
        PacketCommand::Wrc { action } => match action {
            WrcAction::Decode(args) => wrc_view(&decode::<WrcPacket>(&args)?),
            WrcAction::Build(args) => {
                let packet = build_wrc(args);
                with_framed(wrc_view(&packet), &packet.encode())
            }
        },
    };
    print_record(&record, format);
    Ok(SUCCESS)
}

fn decode<P: WirePacket>(args: &PacketDecodeArgs) -> CliResult<P> {
    let framed = parse_hex_arg(&args.hex)?;
    if args.lossy {
        return Ok(P::decode_lossy(&framed));
    }
    P::decode(&framed).map_err(|err| packet_error("packet decode failed", err))
}

fn with_framed(mut record: Value, framed: &[u8]) -> Value {
    if let Value::Object(map) = &mut record {
        map.insert("framed".to_string(), Value::String(format_hex(framed)));
    }
    record
}

pub fn usb_view(packet: &UsbLocalPacket) -> Value {
    json!({
        "family": "usb",
        "packet_type": packet.packet_type(),
        "kind": packet.kind(),
        "payload_len": packet.payload_len(),
        "payload": packet.payload(),
    })
}

pub fn wrc_view(packet: &WrcPacket) -> Value {
    let mut record = json!({
        "family": "wrc",
        "sequence_id": packet.sequence_id(),
        "mac": format!("0x{:08X}", packet.mac()),
        "direction": Direction::from(packet.direction()),
        "variable_len": packet.variable_len(),
        "packet_type": packet.packet_type(),
        "kind": packet.kind(),
        "payload_len": packet.payload_len(),
        "payload": packet.payload(),
    });
    if let (Value::Object(map), Some(detail)) = (&mut record, wrc_detail(packet.payload())) {
        map.insert("detail".to_string(), detail);
    }
    record
}

/// Human-readable decoding of bit-packed payload fields.
fn wrc_detail(payload: &WrcPayload) -> Option<Value> {
    match payload {
        WrcPayload::InlineJointData(records) => Some(Value::Array(
            records
                .iter()
                .map(|record| {
                    let mut joint = joint_flags_view(record.flag);
                    if let Value::Object(map) = &mut joint {
                        map.insert("joint_id".to_string(), json!(record.joint_id));
                    }
                    joint
                })
                .collect(),
        )),
        WrcPayload::SetJoint(joint) => Some(json!({
            "mode": joint.flag.mode().as_str(),
            "method": joint.flag.method().map(JointMethod::as_str),
            "unit": joint.flag.unit().map(JointUnit::as_str),
        })),
        WrcPayload::StatusReport(report) => Some(json!({
            "status": WrcStatus::from_code(report.status),
        })),
        WrcPayload::InfoEnergy(energy) => Some(json!({
            "charging": energy.flag.charging(),
            "hibernated": energy.flag.hibernated(),
            "power_connected": energy.flag.power_connected(),
        })),
        WrcPayload::GetInfo(request) => Some(json!({
            "serial": request.flag.serial(),
            "generic": request.flag.generic(),
            "energy": request.flag.energy(),
            "timing": request.flag.timing(),
            "network": request.flag.network(),
        })),
        WrcPayload::InfoSerial(serial) => Some(json!({
            "serial": serial.as_u128().to_string(),
        })),
        _ => None,
    }
}

fn joint_flags_view(flag: JointFlags) -> Value {
    json!({
        "valid": flag.valid(),
        "ok": flag.ok(),
        "mode": flag.mode().as_str(),
        "method": flag.method().map(JointMethod::as_str),
        "unit": flag.unit().map(JointUnit::as_str),
    })
}

fn build_usb(build: UsbBuild) -> UsbLocalPacket {
    let payload = match build {
        UsbBuild::Empty => UsbLocalPayload::None,
        UsbBuild::RfStatus { rssi, snr, rscp } => {
            UsbLocalPayload::RfStatus(RfStatus { rssi, snr, rscp })
        }
        UsbBuild::RfControl {
            freq_hz,
            txpower,
            sf,
            bw,
            cr,
            ldro,
        } => UsbLocalPayload::RfControl(RfControl {
            freq_hz,
            rsvd: 0,
            txpower,
            lora: LoraParams { sf, bw, cr, ldro },
        }),
        UsbBuild::MacMode { mode } => UsbLocalPayload::MacMode(MacMode { mode }),
    };
    UsbLocalPacket::with_payload(payload)
}

fn build_wrc(args: WrcBuildArgs) -> WrcPacket {
    let payload = match args.command {
        WrcBuild::GetInfo {
            serial,
            generic,
            energy,
            timing,
            network,
        } => WrcPayload::GetInfo(GetInfo {
            flag: info_request(serial, generic, energy, timing, network),
        }),
        WrcBuild::SetJoint(joint) => WrcPayload::SetJoint(set_joint(&joint)),
        WrcBuild::SetWrenchTime { unix_time } => WrcPayload::SetWrenchTime(SetWrenchTime {
            unix_time: unix_time.unwrap_or_else(now_unix_seconds),
        }),
        WrcBuild::GetJointData { start, count } => WrcPayload::GetJointData(GetJointData {
            joint_id_start: start,
            joint_count: count,
        }),
        WrcBuild::ClearJointData => WrcPayload::ClearJointData,
        WrcBuild::GetStatusReport => WrcPayload::GetStatusReport,
        WrcBuild::Beep => WrcPayload::Beep,
    };

    let direction = if args.from_client {
        Direction::FromClient
    } else {
        Direction::FromServer
    };
    let mut packet = WrcPacket::with_payload(payload);
    packet.set_sequence_id(args.seq);
    packet.set_mac(args.mac);
    packet.set_direction(direction.into());
    packet
}

// No selection means every report.
fn info_request(serial: bool, generic: bool, energy: bool, timing: bool, network: bool) -> InfoRequest {
    let selected = [
        (serial, InfoRequest::SERIAL),
        (generic, InfoRequest::GENERIC),
        (energy, InfoRequest::ENERGY),
        (timing, InfoRequest::TIMING),
        (network, InfoRequest::NETWORK),
    ];
    let any = selected.iter().any(|(on, _)| *on);
    selected
        .into_iter()
        .filter(|(on, _)| *on || !any)
        .fold(InfoRequest::default(), |acc, (_, bit)| acc | bit)
}

fn set_joint(args: &SetJointArgs) -> SetJoint {
    let mut flag = JointConfigFlags::default();
    flag.set_mode(args.mode.into());
    flag.set_method(args.method.into());
    flag.set_unit(args.unit.into());
    SetJoint {
        torque_setpoint: args.torque,
        torque_angle_start: args.torque_angle_start,
        torque_upper_tol: args.torque_upper_tol,
        torque_lower_tol: args.torque_lower_tol,
        angle: args.angle,
        angle_upper_tol: args.angle_upper_tol,
        angle_lower_tol: args.angle_lower_tol,
        fdt: args.fdt,
        fda: args.fda,
        task_repeat_times: args.repeat,
        task_id: args.task_id,
        flag,
    }
}

fn now_unix_seconds() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u32::try_from(d.as_secs()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

impl From<ModeArg> for JointMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Torque => Self::Torque,
            ModeArg::Angle => Self::Angle,
            ModeArg::TorqueAngle => Self::TorqueAngle,
            ModeArg::AngleTorque => Self::AngleTorque,
        }
    }
}

impl From<MethodArg> for JointMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Click => Self::Click,
            MethodArg::Peak => Self::Peak,
            MethodArg::Track => Self::Track,
        }
    }
}

impl From<UnitArg> for JointUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Nm => Self::Nm,
            UnitArg::InLb => Self::InLb,
            UnitArg::FtLb => Self::FtLb,
        }
    }
}
