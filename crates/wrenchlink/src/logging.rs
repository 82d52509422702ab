use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Crates whose events follow `--log-level`.
const WORKSPACE_TARGETS: &[&str] = &[
    "wrenchlink",
    "wrenchlink_frame",
    "wrenchlink_packet",
    "wrenchlink_port",
];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// `level` for the frame, packet and port crates; dependencies such as the
/// serial driver never go below `warn`.
pub fn log_targets(level: LogLevel) -> Targets {
    let level = level.as_filter();
    let dependencies = level.min(LevelFilter::WARN);
    WORKSPACE_TARGETS
        .iter()
        .fold(Targets::new().with_default(dependencies), |targets, target| {
            targets.with_target(*target, level)
        })
}

/// Route `tracing` events to stderr; stdout carries decoded packets.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let targets = log_targets(level);
    let registry = tracing_subscriber::registry().with(targets);

    let _ = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
}
