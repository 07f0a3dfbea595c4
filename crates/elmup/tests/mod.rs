mod common;

use elmup_core::BuildError;
use elmup_plugin_elm::wrap_elm_code;

use crate::common::{build, write_fixture};

const FIXTURE: &[(&str, &str)] = &[
  ("src/Client.elm", "module Client exposing (main)\n"),
  ("src/Server.elm", "module Server exposing (main)\n"),
  ("src/index.js", "import Elm from './Client.elm';\n"),
];

#[tokio::test]
async fn plain_build_registers_returned_dependencies() {
  let dir = tempfile::tempdir().unwrap();
  write_fixture(dir.path(), FIXTURE);
  let root = dir.path().to_string_lossy().to_string();

  let output = build(dir.path(), &["src/Client.elm", "src/Server.elm", "src/index.js"], false)
    .generate()
    .await
    .unwrap();

  assert!(output.errors.is_empty());
  assert_eq!(output.modules.len(), 3);

  let client = output
    .module_by_id(&format!("{}/src/Client.elm", root))
    .unwrap();
  assert_eq!(
    client.code,
    wrap_elm_code("/* compiled Client */ this.Elm = { Client: {} };")
  );
  assert_eq!(client.dependencies, vec![format!("{}/src/Shared.elm", root)]);

  let index = output.module_by_id(&format!("{}/src/index.js", root)).unwrap();
  assert_eq!(index.code, "import Elm from './Client.elm';\n");
  assert_eq!(index.map, None);

  assert_eq!(output.watch_files, vec![format!("{}/src/Shared.elm", root)]);
}

#[tokio::test]
async fn watch_build_lets_plugins_register_files() {
  let dir = tempfile::tempdir().unwrap();
  write_fixture(dir.path(), FIXTURE);
  let root = dir.path().to_string_lossy().to_string();

  let elmup = build(dir.path(), &["src/Client.elm"], true);
  let output = elmup.generate().await.unwrap();

  let client = output
    .module_by_id(&format!("{}/src/Client.elm", root))
    .unwrap();
  assert!(client.dependencies.is_empty());
  assert!(elmup
    .watch_files()
    .contains(&format!("{}/src/Shared.elm", root)));
  assert_eq!(output.watch_files, vec![format!("{}/src/Shared.elm", root)]);
}

#[tokio::test]
async fn failing_module_does_not_stop_the_others() {
  let dir = tempfile::tempdir().unwrap();
  write_fixture(dir.path(), FIXTURE);
  write_fixture(dir.path(), &[("src/Broken.elm", "module Broken exposing syntax error\n")]);

  let output = build(dir.path(), &["src/Client.elm", "src/Broken.elm"], false)
    .generate()
    .await
    .unwrap();

  assert_eq!(output.modules.len(), 1);
  assert_eq!(output.errors.len(), 1);
  let message = output.errors[0].to_string();
  assert!(message.contains("[plugin elm]"));
  assert!(message.contains("PROBLEM IN SYNTAX"));
}

#[tokio::test]
async fn missing_input_is_a_load_error() {
  let dir = tempfile::tempdir().unwrap();

  let output = build(dir.path(), &["src/Nope.elm"], false)
    .generate()
    .await
    .unwrap();

  assert!(output.modules.is_empty());
  assert!(matches!(output.errors[0], BuildError::Load { .. }));
}

#[tokio::test]
async fn write_emits_one_file_per_module() {
  let dir = tempfile::tempdir().unwrap();
  write_fixture(dir.path(), FIXTURE);

  build(dir.path(), &["src/Client.elm", "src/index.js"], false)
    .write()
    .await
    .unwrap();

  let client = std::fs::read_to_string(dir.path().join("dist/src_Client_elm.js")).unwrap();
  assert!(client.contains("export default wrapper;"));
  assert!(dir.path().join("dist/src_index_js.js").exists());
}

#[tokio::test]
async fn modules_outside_root_get_their_own_file() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path().join("project");
  write_fixture(&root, &[("other/src/Main.elm", "module Main exposing (inside)\n")]);
  write_fixture(dir.path(), &[("other/src/Main.elm", "module Main exposing (outside)\n")]);
  let outside = dir.path().join("other/src/Main.elm").to_string_lossy().to_string();

  build(&root, &["other/src/Main.elm", outside.as_str()], false)
    .write()
    .await
    .unwrap();

  assert!(root.join("dist/other_src_Main_elm.js").exists());
  assert!(root.join("dist/.._other_src_Main_elm.js").exists());
}

#[tokio::test]
async fn write_refuses_a_failed_build() {
  let dir = tempfile::tempdir().unwrap();
  write_fixture(dir.path(), &[("src/Broken.elm", "syntax error")]);

  let err = build(dir.path(), &["src/Broken.elm"], false)
    .write()
    .await
    .unwrap_err();

  assert!(err.to_string().contains("1 module(s) failed to build"));
  assert!(!dir.path().join("dist").exists());
}
