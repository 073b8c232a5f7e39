use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install the global fmt subscriber. Safe to call more than once; only the
/// first call takes effect.
pub fn init_logger(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_target(true) // <-- shows crate/module path
            .with_line_number(true)
            .init();

        tracing::info!(service = service_name, "logger initialized");
    });
}
