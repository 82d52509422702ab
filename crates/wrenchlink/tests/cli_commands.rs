#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

use wrenchlink::packet::{SetWrenchTime, UsbLocalPacket, WirePacket, WrcPacket, WrcPayload};

fn wrenchlink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wrenchlink"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("wrenchlink should run")
}

fn unique_temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "wrenchlink-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn encode_prints_framed_hex() {
    let output = wrenchlink(&["encode", "CAFEBABE"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"hex\":\"00 CB 7F AF 57 EF 02\""));
    assert!(stdout.contains("\"output_len\":7"));
}

#[test]
fn decode_ignores_padding_bits() {
    let output = wrenchlink(&["decode", "00 CB 7F AF 57 E1 02"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"hex\":\"CA FE BA BE\""));
}

#[test]
fn decode_without_frame_returns_60() {
    let output = wrenchlink(&["decode", "CAFEBABE"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no SM7Bit frame"));
}

#[test]
fn invalid_hex_returns_60() {
    let output = wrenchlink(&["encode", "XYZ"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn packet_wrc_decode_prints_fields() {
    let packet = WrcPacket::with_payload(WrcPayload::SetWrenchTime(SetWrenchTime {
        unix_time: 1_700_000_000,
    }));
    let hex: Vec<String> = packet.encode().iter().map(|b| format!("{b:02X}")).collect();

    let output = wrenchlink(&["packet", "wrc", "decode", &hex.join("")]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"kind\":\"SetWrenchTime\""));
    assert!(stdout.contains("\"unix_time\":1700000000"));
    assert!(stdout.contains("\"payload_len\":4"));
}

#[test]
fn packet_usb_decode_of_wrc_frame_is_not_truncated() {
    // A USB-local decode of a 248-byte body keeps the first 12 bytes.
    let hex: Vec<String> = WrcPacket::default()
        .encode()
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect();
    let output = wrenchlink(&["packet", "usb", "decode", &hex.join(" ")]);
    assert!(output.status.success());
}

#[test]
fn packet_wrc_decode_of_usb_frame_fails_unless_lossy() {
    let hex: Vec<String> = UsbLocalPacket::default()
        .encode()
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect();
    let hex = hex.join("");

    let strict = wrenchlink(&["packet", "wrc", "decode", &hex]);
    assert_eq!(strict.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&strict.stderr).contains("truncated"));

    let lossy = wrenchlink(&["packet", "wrc", "decode", "--lossy", &hex]);
    assert!(lossy.status.success());
}

#[test]
fn packet_build_emits_frame() {
    let output = wrenchlink(&[
        "packet", "wrc", "build", "--seq", "3", "get-joint-data", "--start", "10", "--count", "5",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"framed\":\"00 "));
    assert!(stdout.contains("\"joint_id_start\":10"));
    assert!(stdout.contains("\"sequence_id\":3"));
}

#[test]
fn inspect_capture_file_prints_each_packet() {
    let path = unique_temp_path("capture");
    let mut capture = vec![0xFF, 0x13];
    capture.extend(UsbLocalPacket::default().encode());
    capture.extend(WrcPacket::with_payload(WrcPayload::Beep).encode());
    capture.extend(WrcPacket::with_payload(WrcPayload::ClearJointData).encode());
    std::fs::write(&path, capture).expect("capture should be writable");

    let path_arg = path.to_string_lossy().to_string();
    let output = wrenchlink(&["inspect", &path_arg]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("\"family\":\"usb\""));
    assert!(lines[1].contains("\"kind\":\"Beep\""));
    assert!(lines[2].contains("\"kind\":\"ClearJointData\""));

    let output = wrenchlink(&["inspect", &path_arg, "--count", "1"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ports_lists_host_ports() {
    let output = wrenchlink(&["ports"]);
    match output.status.code() {
        // Hosts without a port listing report a port error instead.
        Some(3) => assert!(String::from_utf8_lossy(&output.stderr).contains("list failed")),
        Some(0) => assert!(String::from_utf8_lossy(&output.stdout).contains("\"count\":")),
        other => panic!("unexpected exit status {other:?}"),
    }
}

#[test]
fn inspect_missing_device_fails() {
    let path = unique_temp_path("no-such-port");
    let output = wrenchlink(&["inspect", &path.to_string_lossy()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot open port"));
}

#[test]
fn version_prints_name() {
    let output = wrenchlink(&["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("wrenchlink "));
}
