mod commands;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use livetable_fs::HostConfig;
use tracing::debug;

use crate::logging::LogOptions;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Debug, Parser)]
#[command(version, about)]
/// livetable, live monitoring state as tables.
///
/// livetable exposes the state recorded by the monitoring components, such as
/// crash reports, as tables that can be described and queried.
pub struct Args {
    #[command(flatten)]
    logging: LogOptions,
    #[arg(
        long,
        env = "LIVETABLE_CRASH_REPORT_PATH",
        default_value = "/var/lib/livetable/crashes/"
    )]
    /// The directory crash reports are stored in.
    crash_report_path: PathBuf,
    #[arg(long, env = "LIVETABLE_STRICT_FILE_ARGUMENTS")]
    /// Reject `file:` column arguments that are not a relative path in normal form.
    ///
    /// By default arguments are passed through as given, which allows
    /// `..` components to address files outside the crash report directory.
    strict_file_arguments: bool,
    #[command(subcommand)]
    command: commands::Commands,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    args.logging.init().context("Init logging")?;
    debug!("livetable v{}", env!("CARGO_PKG_VERSION"));

    let config = HostConfig::builder()
        .crash_report_path(args.crash_report_path.clone())
        .strict_file_arguments(args.strict_file_arguments)
        .build();

    args.command.execute(Arc::new(config))
}
