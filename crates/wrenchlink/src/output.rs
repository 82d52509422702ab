use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;
use wrenchlink_port::{PortEvent, PortInfo};

use crate::hex::format_hex;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct BytesOutput<'a> {
    operation: &'a str,
    input_len: usize,
    output_len: usize,
    hex: String,
}

/// Print the result of a raw encode/decode.
pub fn print_bytes(operation: &str, input: &[u8], output: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = BytesOutput {
                operation,
                input_len: input.len(),
                output_len: output.len(),
                hex: format_hex(output),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["OPERATION", "IN", "OUT", "HEX"]);
            table.add_row(vec![
                operation.to_string(),
                input.len().to_string(),
                output.len().to_string(),
                format_hex(output),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", format_hex(output)),
    }
}

/// Print one structured record (a decoded packet, a built packet).
pub fn print_record(record: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            for (field, value) in flatten(record) {
                table.add_row(vec![field, value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let line: Vec<String> = flatten(record)
                .into_iter()
                .map(|(field, value)| format!("{field}={value}"))
                .collect();
            println!("{}", line.join(" "));
        }
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    port_name: &'a str,
    description: &'a str,
}

impl<'a> From<&'a PortInfo> for PortOutput<'a> {
    fn from(port: &'a PortInfo) -> Self {
        Self {
            port_name: &port.port_name,
            description: &port.description,
        }
    }
}

#[derive(Serialize)]
struct PortListOutput<'a> {
    count: usize,
    ports: Vec<PortOutput<'a>>,
}

pub fn print_ports(ports: &[PortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PortListOutput {
                count: ports.len(),
                ports: ports.iter().map(PortOutput::from).collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["PORT", "DESCRIPTION"]);
            for port in ports {
                table.add_row(vec![port.port_name.clone(), port.description.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for port in ports {
                println!("{}\t{}", port.port_name, port.description);
            }
        }
    }
}

#[derive(Serialize)]
struct PortEventOutput<'a> {
    event: &'static str,
    #[serde(flatten)]
    port: PortOutput<'a>,
}

pub fn print_port_event(event: &PortEvent, format: OutputFormat) {
    let (name, marker) = match event {
        PortEvent::Added(_) => ("added", '+'),
        PortEvent::Removed(_) => ("removed", '-'),
    };
    let port = event.port();
    match format {
        OutputFormat::Json => {
            let out = PortEventOutput {
                event: name,
                port: PortOutput::from(port),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["EVENT", "PORT", "DESCRIPTION"]);
            table.add_row(vec![
                name.to_string(),
                port.port_name.clone(),
                port.description.clone(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{marker} {} ({})", port.port_name, port.description);
        }
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Flatten nested JSON into `a.b[0].c` paths. Byte arrays collapse to hex.
fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten_into(value, String::new(), &mut rows);
    rows
}

fn flatten_into(value: &Value, path: String, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten_into(child, child_path, rows);
            }
        }
        Value::Array(items) => match as_bytes(items) {
            Some(bytes) => rows.push((path, format_hex(&bytes))),
            None => {
                for (i, child) in items.iter().enumerate() {
                    flatten_into(child, format!("{path}[{i}]"), rows);
                }
            }
        },
        Value::String(text) => rows.push((path, text.clone())),
        Value::Null => rows.push((path, "-".to_string())),
        other => rows.push((path, other.to_string())),
    }
}

fn as_bytes(items: &[Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}
