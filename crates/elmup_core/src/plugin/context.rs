use std::sync::atomic::{AtomicBool, Ordering};

use crate::{BuildError, BundlerHost, WatchRegistry};

/// Per-hook view of the bundler, bound to one plugin and one module.
#[derive(Debug)]
pub struct PluginContext<'a> {
  plugin: &'a str,
  id: &'a str,
  host: &'a BundlerHost,
  reported: AtomicBool,
}

impl<'a> PluginContext<'a> {
  pub fn new(plugin: &'a str, id: &'a str, host: &'a BundlerHost) -> Self {
    Self {
      plugin,
      id,
      host,
      reported: AtomicBool::new(false),
    }
  }

  pub fn id(&self) -> &str {
    self.id
  }

  pub fn watch_registry(&self) -> Option<&dyn WatchRegistry> {
    self.host.watch_registry()
  }

  /// Returns `false` when the bundler can't watch files, in which case the
  /// caller is expected to hand the path back in its hook output.
  pub fn add_watch_file(&self, path: &str) -> bool {
    match self.watch_registry() {
      Some(registry) => {
        registry.add_watch_file(path);
        true
      }
      None => false,
    }
  }

  /// Surfaces `err` through the bundler's error channel and returns it, tagged
  /// with the plugin and module, for the hook to propagate.
  pub fn error(&self, err: impl Into<anyhow::Error>) -> BuildError {
    let err = BuildError::plugin(self.plugin, self.id, err);
    self.host.report(&err);
    self.reported.store(true, Ordering::SeqCst);
    err
  }

  pub(crate) fn has_reported(&self) -> bool {
    self.reported.load(Ordering::SeqCst)
  }
}
