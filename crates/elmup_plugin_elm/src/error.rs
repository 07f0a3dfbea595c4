use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElmError {
  #[error("Compiling {path} failed:\n{message}")]
  Compile { path: String, message: String },
  #[error("Fail to find the dependencies of {path}: {reason}")]
  DependencyResolution { path: String, reason: String },
  #[error("Invalid elm plugin options: {0}")]
  Configuration(String),
}

impl ElmError {
  pub fn compile(path: &str, message: impl Into<String>) -> Self {
    Self::Compile {
      path: path.to_owned(),
      message: message.into(),
    }
  }

  pub fn dependency_resolution(path: &str, reason: impl ToString) -> Self {
    Self::DependencyResolution {
      path: path.to_owned(),
      reason: reason.to_string(),
    }
  }
}
