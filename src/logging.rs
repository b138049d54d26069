use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder};

/// Sends loader logs to stderr so JSON printed on stdout stays parseable.
///
/// `RUST_LOG` wins over `default_filter`. A second call fails because the
/// global subscriber is already set.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize box score logging: {e}"))
}
