use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// Filter comes from `RUST_LOG` (default `info`), e.g.
/// `RUST_LOG=menu_cycle_kitchen=debug`. Log lines go to stderr so tables
/// printed on stdout stay clean.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Debug-level subscriber routed through the test harness; safe to call repeatedly.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
