//! Tracing setup for the CLI
//!
//! Logs go to stderr so command output on stdout stays pipeable.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: Level, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()?;
    } else {
        registry.with(fmt::layer().with_target(false).with_writer(std::io::stderr)).try_init()?;
    }

    Ok(())
}

fn default_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    format!("synvia={level},synvia_common={level},synvia_infra={level}").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_workspace_crates() {
        let filter = default_filter(Level::DEBUG).to_string();
        assert!(filter.contains("synvia_infra=debug"));
        assert!(filter.contains("synvia_common=debug"));
    }
}
