pub mod commands;
pub mod text;

use std::sync::Once;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Log to stderr, filtered by `RUST_LOG` (default `bunsetsu_core=warn`).
/// Closed spans are logged with their timings.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("bunsetsu_core=warn,bunsetsu_cli=info")),
            )
            .init();
    });
}
