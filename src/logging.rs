use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the stderr subscriber. `RUST_LOG` wins when set; otherwise the
/// level is `info`, or `debug` with `MEMORAMA_DEBUG=1`.
pub fn init() {
    let debug_mode = std::env::var("MEMORAMA_DEBUG").is_ok_and(|value| value == "1");
    let default_level = if debug_mode { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    tracing::debug!(debug_mode, "logging initialized");
}
