use std::io;

use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("[plugin {plugin}] {id}: {source:#}")]
  Plugin {
    plugin: String,
    id: String,
    #[source]
    source: anyhow::Error,
  },
  #[error("Fail to load {id}: {source}")]
  Load {
    id: String,
    #[source]
    source: io::Error,
  },
  #[error("Fail to write {path}: {source}")]
  Write {
    path: String,
    #[source]
    source: io::Error,
  },
}

impl BuildError {
  pub fn plugin(plugin: &str, id: &str, source: impl Into<anyhow::Error>) -> Self {
    Self::Plugin {
      plugin: plugin.to_owned(),
      id: id.to_owned(),
      source: source.into(),
    }
  }

  /// The module this error belongs to, if any.
  pub fn id(&self) -> Option<&str> {
    match self {
      Self::Plugin { id, .. } | Self::Load { id, .. } => Some(id),
      Self::Write { .. } => None,
    }
  }
}
