use tracing::instrument;

use crate::{BuildResult, BundlerHost, Plugin, PluginContext, SourceMapStub, TransformArgs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedModule {
  pub id: String,
  pub code: String,
  pub map: Option<SourceMapStub>,
  /// Dependencies plugins handed back because the bundler can't watch files.
  pub dependencies: Vec<String>,
}

#[derive(Debug)]
pub struct PluginDriver {
  pub plugins: Vec<Box<dyn Plugin>>,
  host: BundlerHost,
}

impl PluginDriver {
  pub fn new(plugins: Vec<Box<dyn Plugin>>, host: BundlerHost) -> Self {
    Self { plugins, host }
  }

  pub fn host(&self) -> &BundlerHost {
    &self.host
  }

  /// Runs the transform hook of every plugin in order, each one seeing the
  /// code produced by the previous.
  #[instrument(skip(self, code))]
  pub async fn transform(&self, id: &str, code: String) -> BuildResult<TransformedModule> {
    let mut module = TransformedModule {
      id: id.to_owned(),
      code,
      map: None,
      dependencies: vec![],
    };

    for plugin in &self.plugins {
      let ctx = PluginContext::new(plugin.name(), id, &self.host);
      let output = plugin
        .transform(
          &ctx,
          TransformArgs {
            id,
            code: &module.code,
          },
        )
        .await;

      match output {
        Ok(Some(output)) => {
          tracing::trace!("{} transformed {}", plugin.name(), id);
          module.code = output.code;
          module.map = Some(output.map);
          if let Some(dependencies) = output.dependencies {
            module.dependencies.extend(dependencies);
          }
        }
        Ok(None) => {}
        Err(err) => {
          if !ctx.has_reported() {
            self.host.report(&err);
          }
          return Err(err);
        }
      }
    }

    Ok(module)
  }
}
