use std::{
  path::Path,
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
};

use elmup_core::{
  uri_to_chunk_name, BuildError, BundlerHost, Plugin, PluginDriver, TransformedModule, WatchFiles,
  WatchRegistry,
};
use hashbrown::{HashMap, HashSet};
use sugar_path::PathSugar;

mod transform_job;
use transform_job::{Msg, TransformModuleJob};

#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Modules to transform, relative to `root` unless absolute.
  pub input: Vec<String>,
  pub root: String,
  pub out_dir: String,
  /// Let plugins register watch files instead of returning dependencies.
  pub watch: bool,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      input: vec![],
      root: ".".to_owned(),
      out_dir: "dist".to_owned(),
      watch: false,
    }
  }
}

pub struct Elmup {
  options: Arc<BuildOptions>,
  plugin_driver: Arc<PluginDriver>,
  watch_files: Arc<WatchFiles>,
}

pub fn elmup(options: BuildOptions, plugins: Vec<Box<dyn Plugin>>) -> Elmup {
  let watch_files = Arc::new(WatchFiles::default());
  let host = if options.watch {
    BundlerHost::watch_capable(watch_files.clone())
  } else {
    BundlerHost::plain()
  };
  Elmup {
    options: Arc::new(options),
    plugin_driver: Arc::new(PluginDriver::new(plugins, host)),
    watch_files,
  }
}

#[derive(Debug, Default)]
pub struct ElmupOutput {
  pub modules: HashMap<String, TransformedModule>,
  pub errors: Vec<BuildError>,
  /// Every file a change of which should trigger a rebuild, sorted.
  pub watch_files: Vec<String>,
}

impl ElmupOutput {
  pub fn module_by_id(&self, id: &str) -> Option<&TransformedModule> {
    self.modules.get(id)
  }
}

impl Elmup {
  fn resolve_input(&self, input: &str) -> String {
    let path = Path::new(input);
    let path = if path.is_absolute() {
      path.normalize()
    } else {
      Path::new(&self.options.root).join(path).resolve()
    };
    path.to_string_lossy().to_string()
  }

  /// Transforms every input concurrently. A module that fails is recorded in
  /// `errors` and never stops the others.
  pub async fn generate(&self) -> anyhow::Result<ElmupOutput> {
    let active_task_count = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Msg>();

    self.options.input.iter().for_each(|input| {
      let job = TransformModuleJob::new(
        self.resolve_input(input),
        &active_task_count,
        tx.clone(),
        self.plugin_driver.clone(),
      );
      tokio::task::spawn(async move { job.run().await });
    });
    drop(tx);

    let mut output = ElmupOutput::default();
    while active_task_count.load(Ordering::SeqCst) != 0 {
      match rx.recv().await {
        Some(Msg::TaskFinished(module)) => {
          active_task_count.fetch_sub(1, Ordering::SeqCst);
          // The bundler can't watch on the plugins' behalf, so it registers
          // what they handed back itself.
          module
            .dependencies
            .iter()
            .for_each(|dependency| self.watch_files.add_watch_file(dependency));
          output.modules.insert(module.id.clone(), *module);
        }
        Some(Msg::TaskErrorEncountered(err)) => {
          active_task_count.fetch_sub(1, Ordering::SeqCst);
          output.errors.push(err);
        }
        None => {
          tracing::trace!("All sender is dropped");
          break;
        }
      }
    }

    output.watch_files = self.watch_files.to_sorted_vec();
    tracing::trace!(
      "transformed {} modules, {} errors",
      output.modules.len(),
      output.errors.len()
    );
    Ok(output)
  }

  /// Generates and writes every module to `out_dir`. Nothing is written when
  /// any module failed.
  pub async fn write(&self) -> anyhow::Result<ElmupOutput> {
    let output = self.generate().await?;
    if !output.errors.is_empty() {
      let messages = output
        .errors
        .iter()
        .map(|err| err.to_string())
        .collect::<Vec<_>>();
      anyhow::bail!(
        "{} module(s) failed to build:\n{}",
        messages.len(),
        messages.join("\n")
      );
    }

    let out_dir = Path::new(&self.options.root).join(&self.options.out_dir);
    tokio::fs::create_dir_all(&out_dir)
      .await
      .map_err(|source| BuildError::Write {
        path: out_dir.to_string_lossy().to_string(),
        source,
      })?;

    let root = Path::new(&self.options.root).resolve();
    let mut written = HashSet::new();
    for module in output.modules.values() {
      let mut file = uri_to_chunk_name(&root.to_string_lossy(), &module.id);
      file.push_str(".js");
      if !written.insert(file.clone()) {
        anyhow::bail!("two modules would both be written to {:?}", file);
      }
      let path = out_dir.join(file);
      tokio::fs::write(&path, &module.code)
        .await
        .map_err(|source| BuildError::Write {
          path: path.to_string_lossy().to_string(),
          source,
        })?;
      tracing::debug!("wrote {:?}", path);
    }
    Ok(output)
  }

  pub fn watch_files(&self) -> &WatchFiles {
    &self.watch_files
  }
}
