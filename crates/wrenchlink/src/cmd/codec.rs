use tracing::debug;

use crate::cmd::BytesArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_bytes, OutputFormat};

pub fn run_encode(args: BytesArgs, format: OutputFormat) -> CliResult<i32> {
    let raw = args.load()?;
    let framed = wrenchlink_frame::encode(&raw);
    debug!(raw = raw.len(), framed = framed.len(), "encoded");
    print_bytes("encode", &raw, &framed, format);
    Ok(SUCCESS)
}

pub fn run_decode(args: BytesArgs, format: OutputFormat) -> CliResult<i32> {
    let framed = args.load()?;
    let raw = wrenchlink_frame::decode(&framed).map_err(|err| frame_error("decode failed", err))?;
    debug!(framed = framed.len(), raw = raw.len(), "decoded");
    print_bytes("decode", &framed, &raw, format);
    Ok(SUCCESS)
}
