use std::fmt::Debug;

use async_trait::async_trait;

use crate::BuildResult;

mod args;
pub use args::*;
mod context;
pub use context::*;
mod plugin_driver;
pub use plugin_driver::*;

pub type PluginTransformHookOutput = BuildResult<Option<TransformOutput>>;

#[async_trait]
pub trait Plugin: Debug + Send + Sync {
  fn name(&self) -> &str;

  /// `Ok(None)` means the plugin doesn't handle this module and the code is
  /// passed on unchanged.
  async fn transform(
    &self,
    _ctx: &PluginContext<'_>,
    _args: TransformArgs<'_>,
  ) -> PluginTransformHookOutput {
    Ok(None)
  }
}
