use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BALLIN_LOG";
const DEFAULT_LEVEL: &str = "info";

/// Installs the stderr subscriber for command-line tools. The filter comes from
/// `BALLIN_LOG` (e.g. `debug`, `ballin=trace`), defaulting to `info`.
pub fn init_cli_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("install log subscriber: {err}"))
}
