/*
 * cli_integration.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the rendition binary.
 */

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

const DOCUMENT: &str = r#"{
  "kind": { "type": "xdom" },
  "children": [
    {
      "kind": { "type": "macro-marker", "id": "heading" },
      "children": [
        {
          "kind": { "type": "header", "level": 1 },
          "children": [ { "kind": { "type": "word", "text": "Hello" } } ]
        }
      ]
    },
    {
      "kind": { "type": "paragraph" },
      "parameters": { "class": "lead" },
      "children": [
        { "kind": { "type": "word", "text": "Some" } },
        { "kind": { "type": "space" } },
        { "kind": { "type": "word", "text": "text" } }
      ]
    }
  ]
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("doc.json"), DOCUMENT).expect("Failed to write document");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_rendition"))
            .args(args)
            .current_dir(self.dir.path())
            .env("RUST_LOG", "off")
            .output()
            .expect("Failed to run rendition")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is not UTF-8")
}

#[test]
fn test_events_command() {
    let ws = Workspace::new();
    let output = ws.run(&["events", "doc.json"]);
    assert!(output.status.success());

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.first(), Some(&"beginDocument"));
    assert!(lines.contains(&"beginMacroMarker [heading, , false]"));
    assert!(lines.contains(&"beginHeader [1, ]"));
    assert!(lines.contains(&"beginParagraph [class]=[lead]"));
    assert_eq!(lines.last(), Some(&"endDocument"));
}

#[test]
fn test_transform_with_config() {
    let ws = Workspace::new();
    fs::write(
        ws.path("rendition.toml"),
        "[rendering]\ntransformations = [\"strip-macro-markers\", \"header-ids\"]\n",
    )
    .unwrap();

    let output = ws.run(&["transform", "doc.json", "--config", "rendition.toml"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("beginHeader [1, HHello]"));
    assert!(!text.contains("MacroMarker"));
}

#[test]
fn test_transform_json_output() {
    let ws = Workspace::new();
    let output = ws.run(&["transform", "doc.json", "-t", "header-ids", "--output", "json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let header = &json["children"][0]["children"][0]["kind"];
    assert_eq!(header["type"], "header");
    assert_eq!(header["id"], "HHello");
}

#[test]
fn test_unknown_transformation_is_skipped() {
    let ws = Workspace::new();
    let output = ws.run(&["transform", "doc.json", "-t", "does-not-exist"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("beginMacroMarker"));
}

#[test]
fn test_invalid_syntax_fails() {
    let ws = Workspace::new();
    let output = ws.run(&["transform", "doc.json", "--syntax", "xwiki"]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_input_fails() {
    let ws = Workspace::new();
    let output = ws.run(&["events", "missing.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.json"));
}
