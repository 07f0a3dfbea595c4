use std::{fs, path::Path, sync::Arc};

use async_trait::async_trait;
use elmup::{elmup, BuildOptions, Elmup};
use elmup_plugin_elm::{CompilerOptions, ElmCompiler, ElmError, ElmPlugin, ElmPluginOptions};

/// Compiles a module to a comment naming it; modules whose source contains
/// `syntax error` fail.
#[derive(Debug)]
pub struct FixtureCompiler;

#[async_trait]
impl ElmCompiler for FixtureCompiler {
  async fn compile(&self, path: &str, _options: &CompilerOptions) -> Result<String, ElmError> {
    let source = tokio::fs::read_to_string(path)
      .await
      .map_err(|err| ElmError::compile(path, err.to_string()))?;
    if source.contains("syntax error") {
      return Err(ElmError::compile(path, "-- PROBLEM IN SYNTAX -- syntax error"));
    }
    let name = Path::new(path).file_stem().unwrap().to_string_lossy();
    Ok(format!("/* compiled {} */ this.Elm = {{ {}: {{}} }};", name, name))
  }

  async fn find_all_dependencies(&self, path: &str) -> Result<Vec<String>, ElmError> {
    let dir = Path::new(path).parent().unwrap();
    Ok(vec![dir.join("Shared.elm").to_string_lossy().to_string()])
  }
}

pub fn write_fixture(root: &Path, files: &[(&str, &str)]) {
  for (relative, content) in files {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }
}

pub fn build(root: &Path, input: &[&str], watch: bool) -> Elmup {
  let plugin = ElmPlugin::with_compiler(ElmPluginOptions::default(), Arc::new(FixtureCompiler)).unwrap();
  elmup(
    BuildOptions {
      input: input.iter().map(|input| input.to_string()).collect(),
      root: root.to_string_lossy().to_string(),
      watch,
      ..Default::default()
    },
    vec![Box::new(plugin)],
  )
}
