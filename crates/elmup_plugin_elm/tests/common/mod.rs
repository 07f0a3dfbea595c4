#![allow(dead_code)]

use std::{
  collections::HashMap,
  sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
  },
  time::Duration,
};

use async_trait::async_trait;
use elmup_core::{BuildError, ErrorReporter, WatchRegistry};
use elmup_plugin_elm::{CompilerOptions, ElmCompiler, ElmError};

#[derive(Debug, Default)]
pub struct StubCompiler {
  pub code: String,
  pub dependencies: Vec<String>,
  pub compile_error: Option<String>,
  pub dependency_error: Option<String>,
  pub delays: HashMap<String, Duration>,
  pub compile_calls: Mutex<Vec<(String, CompilerOptions)>>,
  pub dependency_calls: AtomicUsize,
}

impl StubCompiler {
  pub fn new(code: &str, dependencies: &[&str]) -> Self {
    Self {
      code: code.to_owned(),
      dependencies: dependencies.iter().map(|dep| dep.to_string()).collect(),
      ..Default::default()
    }
  }

  pub fn compile_calls(&self) -> Vec<(String, CompilerOptions)> {
    self.compile_calls.lock().unwrap().clone()
  }

  pub fn dependency_calls(&self) -> usize {
    self.dependency_calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ElmCompiler for StubCompiler {
  async fn compile(&self, path: &str, options: &CompilerOptions) -> Result<String, ElmError> {
    self
      .compile_calls
      .lock()
      .unwrap()
      .push((path.to_owned(), options.clone()));
    if let Some(delay) = self.delays.get(path) {
      tokio::time::sleep(*delay).await;
    }
    match &self.compile_error {
      Some(message) => Err(ElmError::compile(path, message.clone())),
      None => Ok(self.code.clone()),
    }
  }

  async fn find_all_dependencies(&self, path: &str) -> Result<Vec<String>, ElmError> {
    self.dependency_calls.fetch_add(1, Ordering::SeqCst);
    match &self.dependency_error {
      Some(reason) => Err(ElmError::dependency_resolution(path, reason)),
      None => Ok(self.dependencies.clone()),
    }
  }
}

#[derive(Debug, Default)]
pub struct RecordingWatcher(pub Mutex<Vec<String>>);

impl RecordingWatcher {
  pub fn files(&self) -> Vec<String> {
    self.0.lock().unwrap().clone()
  }
}

impl WatchRegistry for RecordingWatcher {
  fn add_watch_file(&self, path: &str) {
    self.0.lock().unwrap().push(path.to_owned());
  }
}

#[derive(Debug, Default)]
pub struct RecordingReporter(pub Mutex<Vec<String>>);

impl RecordingReporter {
  pub fn messages(&self) -> Vec<String> {
    self.0.lock().unwrap().clone()
  }
}

impl ErrorReporter for RecordingReporter {
  fn report(&self, err: &BuildError) {
    self.0.lock().unwrap().push(err.to_string());
  }
}
