use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use elmup_core::{BuildError, BuildResult, PluginDriver, TransformedModule};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug)]
pub enum Msg {
  TaskFinished(Box<TransformedModule>),
  TaskErrorEncountered(BuildError),
}

pub struct TransformModuleJob {
  id: String,
  tx: UnboundedSender<Msg>,
  plugin_driver: Arc<PluginDriver>,
}

impl TransformModuleJob {
  pub fn new(
    id: String,
    active_task_count: &AtomicUsize,
    tx: UnboundedSender<Msg>,
    plugin_driver: Arc<PluginDriver>,
  ) -> Self {
    active_task_count.fetch_add(1, Ordering::SeqCst);
    Self {
      id,
      tx,
      plugin_driver,
    }
  }

  pub async fn run(self) {
    let msg = match self.transform_module().await {
      Ok(module) => Msg::TaskFinished(Box::new(module)),
      Err(err) => Msg::TaskErrorEncountered(err),
    };
    if let Err(err) = self.tx.send(msg) {
      tracing::trace!("fail to send msg {:?}", err)
    }
  }

  async fn transform_module(&self) -> BuildResult<TransformedModule> {
    let code = load(&self.id).await.map_err(|err| {
      self.plugin_driver.host().report(&err);
      err
    })?;
    self.plugin_driver.transform(&self.id, code).await
  }
}

async fn load(id: &str) -> BuildResult<String> {
  tokio::fs::read_to_string(id)
    .await
    .map_err(|source| BuildError::Load {
      id: id.to_owned(),
      source,
    })
}
