use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static IS_TRACING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Installs a fmt subscriber filtered by `ELMUP_LOG`, falling back to
/// `RUST_LOG`. Does nothing when neither is set or a subscriber is already
/// installed.
pub fn enable_tracing_by_env() {
  let directives = std::env::var("ELMUP_LOG").or_else(|_| std::env::var("RUST_LOG"));
  let Ok(directives) = directives else {
    return;
  };
  if IS_TRACING_ENABLED.swap(true, Ordering::SeqCst) {
    return;
  }

  let registry = tracing_subscriber::registry()
    .with(EnvFilter::new(directives))
    .with(
      fmt::layer()
        .pretty()
        .with_file(true)
        .with_target(false),
    );
  if registry.try_init().is_err() {
    tracing::trace!("a global subscriber is already installed");
  }
}
