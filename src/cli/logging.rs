//! Logging initialization

/// Initialize logging based on the debug flag.
///
/// Diagnostics go to stderr so table output on stdout stays clean. The
/// default filter is quiet; RUST_LOG overrides everything.
pub fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(debug)
        .init();
}
