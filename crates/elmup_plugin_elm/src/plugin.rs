use std::sync::Arc;

use async_trait::async_trait;
use elmup_core::{Plugin, PluginContext, PluginTransformHookOutput, TransformArgs, TransformOutput};

use crate::{wrap_elm_code, ElmCompiler, ElmError, ElmMake, ElmPluginOptions, ModuleFilter};

pub const PLUGIN_NAME: &str = "elm";

const ELM_EXTENSION: &str = ".elm";

fn has_elm_extension(id: &str) -> bool {
  id.len() > ELM_EXTENSION.len()
    && id
      .get(id.len() - ELM_EXTENSION.len()..)
      .map_or(false, |ext| ext.eq_ignore_ascii_case(ELM_EXTENSION))
}

/// Compiles `.elm` modules into ES modules exporting a loader function.
#[derive(Debug)]
pub struct ElmPlugin {
  options: ElmPluginOptions,
  filter: ModuleFilter,
  compiler: Arc<dyn ElmCompiler>,
}

impl ElmPlugin {
  pub fn new(options: ElmPluginOptions) -> Result<Self, ElmError> {
    Self::with_compiler(options, Arc::new(ElmMake))
  }

  pub fn with_compiler(
    options: ElmPluginOptions,
    compiler: Arc<dyn ElmCompiler>,
  ) -> Result<Self, ElmError> {
    options.validate()?;
    let filter = ModuleFilter::new(&options.include, &options.exclude, options.root.as_deref())?;
    Ok(Self {
      options,
      filter,
      compiler,
    })
  }

  pub fn options(&self) -> &ElmPluginOptions {
    &self.options
  }

  pub fn handles(&self, id: &str) -> bool {
    has_elm_extension(id) && self.filter.matches(id)
  }
}

/// Creates the elm plugin backed by `elm make`.
pub fn elm(options: ElmPluginOptions) -> Result<ElmPlugin, ElmError> {
  ElmPlugin::new(options)
}

#[async_trait]
impl Plugin for ElmPlugin {
  fn name(&self) -> &str {
    PLUGIN_NAME
  }

  async fn transform(
    &self,
    ctx: &PluginContext<'_>,
    args: TransformArgs<'_>,
  ) -> PluginTransformHookOutput {
    let id = args.id;
    if !self.handles(id) {
      return Ok(None);
    }

    let code = self
      .compiler
      .compile(id, &self.options.compiler)
      .await
      .map_err(|err| ctx.error(err))?;
    let dependencies = self
      .compiler
      .find_all_dependencies(id)
      .await
      .map_err(|err| ctx.error(err))?;
    tracing::debug!("{} depends on {} files", id, dependencies.len());

    let output = TransformOutput::new(wrap_elm_code(&code));
    Ok(Some(match ctx.watch_registry() {
      Some(registry) => {
        dependencies
          .iter()
          .for_each(|dependency| registry.add_watch_file(dependency));
        output
      }
      None => output.with_dependencies(dependencies),
    }))
  }
}
