use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "revenue_forecast=info";

/// Installs the global subscriber. `RUST_LOG` replaces the default filter.
/// Logs go to stderr so stdout only carries command output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
