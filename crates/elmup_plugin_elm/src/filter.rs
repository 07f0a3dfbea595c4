use std::path::Path;

use elmup_core::normalize_id;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::ElmError;

/// Include/exclude matcher, compiled once from glob patterns.
#[derive(Debug, Clone)]
pub struct ModuleFilter {
  include: Option<GlobSet>,
  exclude: Option<GlobSet>,
}

impl ModuleFilter {
  pub fn new(include: &[String], exclude: &[String], root: Option<&Path>) -> Result<Self, ElmError> {
    Ok(Self {
      include: build_glob_set(include, root)?,
      exclude: build_glob_set(exclude, root)?,
    })
  }

  /// Exclusion wins over inclusion, and an empty include list lets everything
  /// through.
  pub fn matches(&self, id: &str) -> bool {
    if id.contains('\0') {
      return false;
    }
    let id = normalize_id(id);
    if let Some(exclude) = &self.exclude {
      if exclude.is_match(&id) {
        return false;
      }
    }
    match &self.include {
      Some(include) => include.is_match(&id),
      None => true,
    }
  }
}

fn build_glob_set(patterns: &[String], root: Option<&Path>) -> Result<Option<GlobSet>, ElmError> {
  if patterns.is_empty() {
    return Ok(None);
  }
  let mut builder = GlobSetBuilder::new();
  for pattern in patterns {
    let pattern = resolve_pattern(pattern, root);
    let glob = GlobBuilder::new(&pattern)
      .literal_separator(true)
      .build()
      .map_err(|err| ElmError::Configuration(format!("invalid pattern {:?}: {}", pattern, err)))?;
    builder.add(glob);
  }
  builder
    .build()
    .map(Some)
    .map_err(|err| ElmError::Configuration(err.to_string()))
}

fn resolve_pattern(pattern: &str, root: Option<&Path>) -> String {
  let pattern = normalize_id(pattern);
  match root {
    Some(root) if !pattern.starts_with('*') && !Path::new(&pattern).is_absolute() => {
      let root = normalize_id(&root.to_string_lossy());
      format!(
        "{}/{}",
        root.trim_end_matches('/'),
        pattern.trim_start_matches("./")
      )
    }
    _ => pattern,
  }
}
