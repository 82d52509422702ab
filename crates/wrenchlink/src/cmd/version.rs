use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("wrenchlink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: wrenchlink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("WRENCHLINK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "features: async={}, serde={}, cli=true",
        cfg!(feature = "async"),
        cfg!(feature = "serde")
    );
    println!(
        "wire: usb_body={} wrc_body={} max_frame={}",
        wrenchlink_packet::USB_BODY_SIZE,
        wrenchlink_packet::WRC_BODY_SIZE,
        wrenchlink_frame::DEFAULT_MAX_FRAME
    );

    Ok(SUCCESS)
}
