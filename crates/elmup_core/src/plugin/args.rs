use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct TransformArgs<'a> {
  pub id: &'a str,
  pub code: &'a str,
}

/// Placeholder source map. Plugins that can't produce a real mapping return
/// this so the bundler drops the mapping for the module instead of keeping a
/// stale one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMapStub {
  pub mappings: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformOutput {
  pub code: String,
  pub map: SourceMapStub,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dependencies: Option<Vec<String>>,
}

impl TransformOutput {
  pub fn new(code: String) -> Self {
    Self {
      code,
      map: SourceMapStub::default(),
      dependencies: None,
    }
  }

  pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
    self.dependencies = Some(dependencies);
    self
  }
}
