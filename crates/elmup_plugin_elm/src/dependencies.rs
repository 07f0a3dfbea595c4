use std::{
  path::{Path, PathBuf},
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
};

use dashmap::DashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use sugar_path::PathSugar;
use tokio::sync::mpsc::UnboundedSender;

use crate::ElmError;

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?m)^import\s+([A-Z][A-Za-z0-9_]*(?:\.[A-Z][A-Za-z0-9_]*)*)")
    .expect("import pattern is valid")
});

#[derive(Debug, Deserialize)]
struct ElmJson {
  #[serde(rename = "type")]
  kind: String,
  #[serde(rename = "source-directories", default)]
  source_directories: Vec<PathBuf>,
}

async fn is_file(path: &Path) -> bool {
  tokio::fs::metadata(path)
    .await
    .map(|meta| meta.is_file())
    .unwrap_or(false)
}

/// Directory of the nearest `elm.json` above `entry`.
pub async fn find_project_root(entry: &Path) -> Option<PathBuf> {
  for dir in entry.ancestors().skip(1) {
    if is_file(&dir.join("elm.json")).await {
      return Some(dir.to_path_buf());
    }
  }
  None
}

/// Source directories of the project `entry` belongs to.
async fn source_directories(entry: &Path) -> Result<Vec<PathBuf>, ElmError> {
  let display = entry.to_string_lossy();
  let Some(project_root) = find_project_root(entry).await else {
    return Err(ElmError::dependency_resolution(
      &display,
      "no elm.json found in any parent directory",
    ));
  };
  let elm_json = project_root.join("elm.json");
  let content = tokio::fs::read_to_string(&elm_json)
    .await
    .map_err(|err| ElmError::dependency_resolution(&display, format!("{:?}: {}", elm_json, err)))?;
  let manifest: ElmJson = serde_json::from_str(&content)
    .map_err(|err| ElmError::dependency_resolution(&display, format!("{:?}: {}", elm_json, err)))?;
  let source_directories = if manifest.kind == "package" {
    vec![PathBuf::from("src")]
  } else {
    manifest.source_directories
  };
  tracing::trace!("{:?} declares {:?}", elm_json, source_directories);
  Ok(
    source_directories
      .into_iter()
      .map(|src| project_root.join(src).normalize())
      .collect(),
  )
}

fn starts_with_at(chars: &[char], at: usize, pattern: &str) -> bool {
  pattern
    .chars()
    .enumerate()
    .all(|(offset, ch)| chars.get(at + offset) == Some(&ch))
}

/// Skips a string or char literal whose opening delimiter ends before `at`,
/// returning the index just past its closing `delimiter`.
fn skip_literal(chars: &[char], mut at: usize, delimiter: &str, output: &mut String) -> usize {
  while at < chars.len() {
    if chars[at] == '\\' {
      at += 2;
    } else if starts_with_at(chars, at, delimiter) {
      return at + delimiter.len();
    } else {
      if chars[at] == '\n' {
        output.push('\n');
      }
      at += 1;
    }
  }
  at
}

/// Keeps only code: `--` line comments, nested `{- -}` block comments and
/// string and char literals are removed. Line breaks are kept.
fn strip_comments_and_literals(source: &str) -> String {
  let chars = source.chars().collect::<Vec<_>>();
  let mut output = String::with_capacity(source.len());
  let mut depth = 0usize;
  let mut at = 0;
  while at < chars.len() {
    let ch = chars[at];
    if depth > 0 {
      if starts_with_at(&chars, at, "{-") {
        depth += 1;
        at += 2;
      } else if starts_with_at(&chars, at, "-}") {
        depth -= 1;
        at += 2;
      } else {
        if ch == '\n' {
          output.push('\n');
        }
        at += 1;
      }
    } else if starts_with_at(&chars, at, "{-") {
      depth = 1;
      at += 2;
    } else if starts_with_at(&chars, at, "--") {
      while at < chars.len() && chars[at] != '\n' {
        at += 1;
      }
    } else if starts_with_at(&chars, at, "\"\"\"") {
      at = skip_literal(&chars, at + 3, "\"\"\"", &mut output);
    } else if ch == '"' || ch == '\'' {
      at = skip_literal(&chars, at + 1, if ch == '"' { "\"" } else { "'" }, &mut output);
    } else {
      output.push(ch);
      at += 1;
    }
  }
  output
}

pub fn parse_imports(source: &str) -> Vec<String> {
  IMPORT_RE
    .captures_iter(&strip_comments_and_literals(source))
    .map(|cap| cap[1].to_owned())
    .collect()
}

fn module_path(module: &str) -> PathBuf {
  let mut path = module.split('.').collect::<PathBuf>();
  path.set_extension("elm");
  path
}

#[derive(Debug)]
enum Msg {
  DependencyFound(PathBuf),
  TaskFinished,
  TaskErrorEncountered(ElmError),
}

#[derive(Debug, Clone)]
struct ScanContext {
  source_directories: Arc<Vec<PathBuf>>,
  visited: Arc<DashSet<PathBuf>>,
  active_task_count: Arc<AtomicUsize>,
}

struct ScanningModuleJob {
  context: ScanContext,
  path: PathBuf,
  tx: UnboundedSender<Msg>,
}

impl ScanningModuleJob {
  fn new(context: ScanContext, path: PathBuf, tx: UnboundedSender<Msg>) -> Self {
    context.active_task_count.fetch_add(1, Ordering::SeqCst);
    Self { context, path, tx }
  }

  async fn run(self) {
    let msg = match self.scan().await {
      Ok(()) => Msg::TaskFinished,
      Err(err) => Msg::TaskErrorEncountered(err),
    };
    self.send(msg);
  }

  fn send(&self, msg: Msg) {
    if let Err(err) = self.tx.send(msg) {
      tracing::trace!("fail to send msg {:?}", err)
    }
  }

  async fn scan(&self) -> Result<(), ElmError> {
    let source = tokio::fs::read_to_string(&self.path)
      .await
      .map_err(|err| ElmError::dependency_resolution(&self.path.to_string_lossy(), err))?;

    for import in parse_imports(&source) {
      let relative = module_path(&import);
      let mut resolved = None;
      for dir in self.context.source_directories.iter() {
        let candidate = dir.join(&relative);
        if is_file(&candidate).await {
          resolved = Some(candidate);
          break;
        }
      }
      // Imports from packages have no file in the source directories.
      let Some(resolved) = resolved else {
        continue;
      };
      if self.context.visited.insert(resolved.clone()) {
        self.send(Msg::DependencyFound(resolved.clone()));
        self.fork(resolved);
      }
    }
    Ok(())
  }

  fn fork(&self, path: PathBuf) {
    let job = ScanningModuleJob::new(self.context.clone(), path, self.tx.clone());
    tokio::task::spawn(async move {
      job.run().await;
    });
  }
}

/// Every project module file `entry` imports, directly or transitively, as
/// sorted absolute paths. The entry itself is not included.
pub async fn find_all_dependencies(entry: &str) -> Result<Vec<String>, ElmError> {
  let entry_path = Path::new(entry).resolve();
  if !is_file(&entry_path).await {
    return Err(ElmError::dependency_resolution(entry, "file not found"));
  }
  let source_directories = source_directories(&entry_path).await?;

  let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Msg>();
  let context = ScanContext {
    source_directories: Arc::new(source_directories),
    visited: Arc::new(DashSet::new()),
    active_task_count: Arc::new(AtomicUsize::new(0)),
  };
  context.visited.insert(entry_path.clone());
  let active_task_count = context.active_task_count.clone();

  let job = ScanningModuleJob::new(context, entry_path, tx);
  tokio::task::spawn(async move { job.run().await });

  let mut dependencies = vec![];
  while active_task_count.load(Ordering::SeqCst) != 0 {
    match rx.recv().await {
      Some(Msg::DependencyFound(path)) => dependencies.push(path),
      Some(Msg::TaskFinished) => {
        active_task_count.fetch_sub(1, Ordering::SeqCst);
      }
      Some(Msg::TaskErrorEncountered(err)) => return Err(err),
      None => {
        tracing::trace!("All sender is dropped");
        break;
      }
    }
  }

  let mut dependencies = dependencies
    .into_iter()
    .map(|path| path.to_string_lossy().to_string())
    .collect::<Vec<_>>();
  dependencies.sort();
  Ok(dependencies)
}
