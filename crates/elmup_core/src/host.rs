use std::{fmt, sync::Arc};

use dashmap::DashSet;

use crate::BuildError;

/// Registers files whose modification should trigger a rebuild.
pub trait WatchRegistry: Send + Sync {
  fn add_watch_file(&self, path: &str);
}

/// The bundler's error channel. Every error a plugin raises for a module
/// passes through here exactly once.
pub trait ErrorReporter: Send + Sync {
  fn report(&self, err: &BuildError);
}

#[derive(Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
  fn report(&self, err: &BuildError) {
    tracing::error!("{}", err);
  }
}

#[derive(Debug, Default)]
pub struct WatchFiles {
  files: DashSet<String>,
}

impl WatchFiles {
  pub fn contains(&self, path: &str) -> bool {
    self.files.contains(path)
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  pub fn to_sorted_vec(&self) -> Vec<String> {
    let mut files = self
      .files
      .iter()
      .map(|file| file.key().clone())
      .collect::<Vec<_>>();
    files.sort();
    files
  }
}

impl WatchRegistry for WatchFiles {
  fn add_watch_file(&self, path: &str) {
    if self.files.insert(path.to_owned()) {
      tracing::trace!("watching {}", path);
    }
  }
}

#[derive(Clone, Default)]
pub enum BundlerCapabilities {
  #[default]
  Plain,
  WatchCapable(Arc<dyn WatchRegistry>),
}

impl fmt::Debug for BundlerCapabilities {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Plain => write!(f, "Plain"),
      Self::WatchCapable(_) => write!(f, "WatchCapable"),
    }
  }
}

/// What a bundler exposes to plugins for the whole session. Capabilities are
/// fixed when the host is built and never re-detected per hook call.
#[derive(Clone)]
pub struct BundlerHost {
  capabilities: BundlerCapabilities,
  reporter: Arc<dyn ErrorReporter>,
}

impl BundlerHost {
  pub fn new(capabilities: BundlerCapabilities, reporter: Arc<dyn ErrorReporter>) -> Self {
    Self {
      capabilities,
      reporter,
    }
  }

  pub fn plain() -> Self {
    Self::new(BundlerCapabilities::Plain, Arc::new(TracingReporter))
  }

  pub fn watch_capable(registry: Arc<dyn WatchRegistry>) -> Self {
    Self::new(
      BundlerCapabilities::WatchCapable(registry),
      Arc::new(TracingReporter),
    )
  }

  pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
    self.reporter = reporter;
    self
  }

  pub fn capabilities(&self) -> &BundlerCapabilities {
    &self.capabilities
  }

  pub fn watch_registry(&self) -> Option<&dyn WatchRegistry> {
    match &self.capabilities {
      BundlerCapabilities::WatchCapable(registry) => Some(registry.as_ref()),
      BundlerCapabilities::Plain => None,
    }
  }

  pub fn report(&self, err: &BuildError) {
    self.reporter.report(err);
  }
}

impl Default for BundlerHost {
  fn default() -> Self {
    Self::plain()
  }
}

impl fmt::Debug for BundlerHost {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BundlerHost")
      .field("capabilities", &self.capabilities)
      .finish()
  }
}
