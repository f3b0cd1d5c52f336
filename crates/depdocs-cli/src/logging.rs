use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber. `RUST_LOG` wins when set; otherwise only
/// warnings, or debug output from our own crates with `--verbose`.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "warn,depdocs=debug,depdocs_registry=debug"
        } else {
            "warn"
        })
    });

    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    // Already installed (tests) is fine.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init();
}
