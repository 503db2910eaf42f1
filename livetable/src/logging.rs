use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Args)]
/// Options controlling the log output, which is always written to stderr
/// so it never mixes with the rows printed on stdout.
pub struct LogOptions {
    #[arg(long, env = "LIVETABLE_LOG_LEVEL", default_value = "warn")]
    /// Set the log level.
    ///
    /// This can filter on various levels, for example `info,livetable_fs=debug`
    /// will display all logs at `info` level severity and above, except for log
    /// events from the file system scanning which are shown from `debug`.
    log_level: String,
    #[arg(long, env = "LIVETABLE_LOG_JSON")]
    /// Emit logs in JSON format rather than as plain text.
    log_json: bool,
    #[arg(long, env = "LIVETABLE_LOG_NO_ANSI")]
    /// Disable ANSI colour codes being present in the logs.
    log_no_ansi: bool,
}

impl LogOptions {
    /// Installs the global subscriber.
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::from_str(&self.log_level)
            .with_context(|| format!("Parse log level {:?}", self.log_level))?;

        let subscriber = tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(self.log_json)
            .with_ansi(!self.log_no_ansi);

        let installed = if self.log_json {
            subscriber.json().try_init()
        } else {
            subscriber.compact().try_init()
        };

        installed
            .map_err(|e| anyhow::anyhow!(e))
            .context("Install log subscriber")
    }
}
