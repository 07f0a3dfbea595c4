/// Namespace the compiled program attaches its entry points to.
pub const ELM_NAMESPACE: &str = "Elm";

/// Wraps compiled Elm output in an ES module whose default export is a loader.
///
/// Calling the loader with a host object runs the compiled program with that
/// object as its context and returns the `Elm` namespace it populated. All
/// state lives inside the loader body, so every host object gets its own
/// program instance.
pub fn wrap_elm_code(code: &str) -> String {
  format!(
    r#"
function wrapper(output) {{
  (function () {{ {code} }}).call(output);
  return output.{namespace};
}}

export default wrapper;
"#,
    code = code,
    namespace = ELM_NAMESPACE
  )
}
