// fybrik-core/src/infrastructure/logging.rs
//
// tracing-subscriber bootstrap, mirrored from the teacher's
// `tracing_subscriber::fmt::init()` call in `main`. `RUST_LOG` drives the
// filter, same as the teacher's "RUST_LOG=debug" comment.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global `tracing` subscriber. Call once, at process
/// start; idempotent in tests since `try_init` ignores a second call.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
