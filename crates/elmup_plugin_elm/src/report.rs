//! Rendering of the JSON reports `elm make --report=json` writes to stderr.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Report {
  CompileErrors { errors: Vec<ModuleErrors> },
  Error {
    path: Option<String>,
    title: String,
    message: Vec<MessageChunk>,
  },
}

#[derive(Debug, Deserialize)]
pub struct ModuleErrors {
  pub path: String,
  pub problems: Vec<Problem>,
}

#[derive(Debug, Deserialize)]
pub struct Problem {
  pub title: String,
  pub region: Region,
  pub message: Vec<MessageChunk>,
}

#[derive(Debug, Deserialize)]
pub struct Region {
  pub start: Position,
}

#[derive(Debug, Deserialize)]
pub struct Position {
  pub line: u32,
  pub column: u32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageChunk {
  Plain(String),
  Styled { string: String },
}

impl MessageChunk {
  fn as_str(&self) -> &str {
    match self {
      Self::Plain(string) | Self::Styled { string } => string,
    }
  }
}

const HEADER_WIDTH: usize = 80;

fn header(title: &str, location: Option<&str>) -> String {
  let location = location.unwrap_or_default();
  let used = title.len() + location.len() + 5;
  let dashes = "-".repeat(HEADER_WIDTH.saturating_sub(used).max(4));
  if location.is_empty() {
    format!("-- {} {}", title, dashes)
  } else {
    format!("-- {} {} {}", title, dashes, location)
  }
}

fn message_text(chunks: &[MessageChunk]) -> String {
  chunks.iter().map(MessageChunk::as_str).collect()
}

impl Report {
  pub fn render(&self) -> String {
    match self {
      Report::CompileErrors { errors } => errors
        .iter()
        .flat_map(|module| {
          module.problems.iter().map(move |problem| {
            let location = format!(
              "{}:{}:{}",
              module.path, problem.region.start.line, problem.region.start.column
            );
            format!(
              "{}\n\n{}",
              header(&problem.title, Some(&location)),
              message_text(&problem.message).trim_end()
            )
          })
        })
        .collect::<Vec<_>>()
        .join("\n\n"),
      Report::Error {
        path,
        title,
        message,
      } => format!(
        "{}\n\n{}",
        header(title, path.as_deref()),
        message_text(message).trim_end()
      ),
    }
  }
}

/// Turns compiler stderr into a readable message, keeping it verbatim when it
/// isn't a JSON report.
pub fn render_stderr(stderr: &str) -> String {
  match serde_json::from_str::<Report>(stderr.trim()) {
    Ok(report) => report.render(),
    Err(_) => stderr.trim().to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_compile_errors_with_location() {
    let stderr = r#"{
      "type": "compile-errors",
      "errors": [{
        "path": "src/Main.elm",
        "name": "Main",
        "problems": [{
          "title": "NAMING ERROR",
          "region": { "start": { "line": 7, "column": 5 }, "end": { "line": 7, "column": 8 } },
          "message": [
            "I cannot find a `",
            { "bold": false, "underline": false, "color": "RED", "string": "foo" },
            "` variable.\n"
          ]
        }]
      }]
    }"#;
    let rendered = render_stderr(stderr);
    assert!(rendered.starts_with("-- NAMING ERROR -"));
    assert!(rendered.contains("src/Main.elm:7:5"));
    assert!(rendered.ends_with("I cannot find a `foo` variable."));
  }

  #[test]
  fn renders_general_errors() {
    let stderr = r#"{"type":"error","path":null,"title":"NO elm.json FILE","message":["It looks like you are starting a new Elm project."]}"#;
    let rendered = render_stderr(stderr);
    assert!(rendered.starts_with("-- NO elm.json FILE"));
    assert!(rendered.ends_with("It looks like you are starting a new Elm project."));
  }

  #[test]
  fn plain_stderr_is_kept() {
    assert_eq!(render_stderr("elm: out of memory\n"), "elm: out of memory");
  }
}
