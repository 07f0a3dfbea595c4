use std::{fmt::Debug, io, path::Path, process::Stdio};

use async_trait::async_trait;
use sugar_path::PathSugar;
use tokio::process::Command;
use tracing::instrument;

use crate::{dependencies, report::render_stderr, CompilerOptions, ElmError};

/// The external Elm compiler. Implementations must be safe to call
/// concurrently for different files.
#[async_trait]
pub trait ElmCompiler: Debug + Send + Sync {
  /// Compiles one module to JavaScript.
  async fn compile(&self, path: &str, options: &CompilerOptions) -> Result<String, ElmError>;

  async fn find_all_dependencies(&self, path: &str) -> Result<Vec<String>, ElmError>;
}

/// Runs `elm make` for every compilation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElmMake;

#[async_trait]
impl ElmCompiler for ElmMake {
  #[instrument(skip(self, options))]
  async fn compile(&self, path: &str, options: &CompilerOptions) -> Result<String, ElmError> {
    let output = tempfile::Builder::new()
      .prefix("elmup-")
      .suffix(".js")
      .tempfile()
      .map_err(|err| ElmError::compile(path, format!("fail to create the output file: {}", err)))?;

    // The id is relative to this process, not to the compiler's working directory.
    let entry = Path::new(path).resolve();
    let mut command = Command::new(&options.path_to_elm);
    command
      .arg("make")
      .arg(&entry)
      .arg(format!("--output={}", output.path().display()))
      .arg("--report=json");
    if options.debug {
      command.arg("--debug");
    }
    if options.optimize {
      command.arg("--optimize");
    }
    // elm make looks for elm.json from its working directory upwards.
    let cwd = match &options.cwd {
      Some(cwd) => Some(cwd.clone()),
      None => dependencies::find_project_root(&entry).await,
    };
    if let Some(cwd) = cwd {
      command.current_dir(cwd);
    }
    command.stdin(Stdio::null()).kill_on_drop(true);

    if options.verbose {
      tracing::debug!("running {:?}", command);
    }

    let result = command.output().await.map_err(|err| {
      let message = match err.kind() {
        io::ErrorKind::NotFound => format!(
          "Could not find the Elm compiler {:?}. Is it installed and on your PATH?",
          options.path_to_elm
        ),
        _ => format!("fail to run {:?}: {}", options.path_to_elm, err),
      };
      ElmError::compile(path, message)
    })?;

    if !result.status.success() {
      let stderr = String::from_utf8_lossy(&result.stderr);
      return Err(ElmError::compile(path, render_stderr(&stderr)));
    }

    tokio::fs::read_to_string(output.path())
      .await
      .map_err(|err| ElmError::compile(path, format!("fail to read the compiled output: {}", err)))
  }

  async fn find_all_dependencies(&self, path: &str) -> Result<Vec<String>, ElmError> {
    dependencies::find_all_dependencies(path).await
  }
}
