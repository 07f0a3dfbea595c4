use std::path::PathBuf;

use serde::Deserialize;

use crate::ElmError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
  pub debug: bool,
  pub optimize: bool,
  /// The `elm` executable to run.
  pub path_to_elm: PathBuf,
  /// Working directory of the compiler process.
  pub cwd: Option<PathBuf>,
  pub verbose: bool,
}

impl Default for CompilerOptions {
  fn default() -> Self {
    Self {
      debug: false,
      optimize: false,
      path_to_elm: PathBuf::from("elm"),
      cwd: None,
      verbose: false,
    }
  }
}

/// Options of the elm plugin.
///
/// Fields left out take their default as a whole: a `compiler` object that is
/// given replaces the default one, so any flag it omits is `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElmPluginOptions {
  pub include: Vec<String>,
  pub exclude: Vec<String>,
  pub compiler: CompilerOptions,
  /// Base directory relative `include`/`exclude` patterns are resolved against.
  pub root: Option<PathBuf>,
}

impl ElmPluginOptions {
  pub fn from_json(value: serde_json::Value) -> Result<Self, ElmError> {
    let options: Self =
      serde_json::from_value(value).map_err(|err| ElmError::Configuration(err.to_string()))?;
    options.validate()?;
    Ok(options)
  }

  pub fn validate(&self) -> Result<(), ElmError> {
    if self.compiler.debug && self.compiler.optimize {
      return Err(ElmError::Configuration(
        "`compiler.debug` and `compiler.optimize` can't be enabled together".to_owned(),
      ));
    }
    Ok(())
  }
}
