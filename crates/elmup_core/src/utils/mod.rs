pub mod log;
use std::path::{Component, Path};

use sugar_path::PathSugar;

/// Output file stem for a module: its path relative to `root`, segments joined
/// with `_`, followed by `_<ext>`. Modules outside `root` keep their `..`
/// segments so they never share a name with a module inside it.
pub fn uri_to_chunk_name(root: &str, uri: &str) -> String {
  let path = Path::new(uri);
  let mut relatived = if path.is_absolute() {
    path.relative(root)
  } else {
    path.to_path_buf()
  };
  let ext = relatived
    .extension()
    .and_then(|ext| ext.to_str())
    .unwrap_or("")
    .to_string();
  relatived.set_extension("");
  let mut name = relatived
    .components()
    .filter_map(|com| match com {
      Component::Normal(seg) => seg.to_str(),
      Component::ParentDir => Some(".."),
      _ => None,
    })
    .collect::<Vec<_>>()
    .join("_");
  name.push('_');
  name.push_str(&ext);
  name
}

/// Module ids compared against glob patterns always use `/`.
pub fn normalize_id(id: &str) -> String {
  id.replace('\\', "/")
}
