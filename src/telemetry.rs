use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str, json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(false)
                    .json(),
            )
            .init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

/// Idempotent subscriber for unit tests: `TEST_LOG`, then `RUST_LOG`, then
/// `warn`.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    use once_cell::sync::OnceCell;

    static INITIALIZED: OnceCell<()> = OnceCell::new();

    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
