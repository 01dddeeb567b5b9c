/*
[INPUT]:  Log level / filter directive
[OUTPUT]: Global tracing subscriber
[POS]:    Observability - logging bootstrap for host processes
[UPDATE]: When changing log format or filter handling
*/

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `log_level`.
///
/// Fails on an invalid directive or when a global subscriber already exists.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
