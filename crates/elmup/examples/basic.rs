use elmup::{elmup, BuildOptions};
use elmup_core::log::enable_tracing_by_env;
use elmup_plugin_elm::{elm, ElmPluginOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  enable_tracing_by_env();

  let mut plugin_options = ElmPluginOptions::default();
  plugin_options.compiler.optimize = true;

  let build = elmup(
    BuildOptions {
      input: vec!["./src/Main.elm".to_owned()],
      root: "./examples/counter-app".to_owned(),
      ..Default::default()
    },
    vec![Box::new(elm(plugin_options)?)],
  );

  let output = build.write().await?;
  println!("watching {:#?}", output.watch_files);
  Ok(())
}
