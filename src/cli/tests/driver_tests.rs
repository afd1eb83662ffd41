use clap::Parser;
use tyshape_emitter::UNKNOWN_VALUE_PLACEHOLDER;

use super::args::CliArgs;
use super::driver::run;

fn run_cli(argv: &[&str]) -> anyhow::Result<(bool, String)> {
    let mut full = vec!["tyshape"];
    full.extend_from_slice(argv);
    let args = CliArgs::try_parse_from(full).expect("args should parse");
    let mut out = Vec::new();
    let ok = run(&args, &mut out)?;
    Ok((ok, String::from_utf8(out).expect("utf-8 output")))
}

fn output(argv: &[&str]) -> String {
    let (ok, out) = run_cli(argv).expect("command should succeed");
    assert!(ok);
    out
}

const MANIFEST: &str = r#"{
  "classes": [
    { "name": "Animal" },
    { "name": "Dog", "parent": "Animal" }
  ],
  "functions": [
    {
      "name": "App\\first",
      "templates": [{ "name": "T" }],
      "params": [
        { "name": "items", "type": "list<T>" },
        { "name": "strict", "type": "bool", "default": "false" }
      ],
      "return_type": "T|null"
    }
  ]
}"#;

#[test]
fn test_parse_prints_canonical_form() {
    assert_eq!(output(&["parse", "int"]), "int\n");
    assert_eq!(output(&["parse", "list<int>"]), "list<int>\n");
}

#[test]
fn test_parse_with_template_scope() {
    assert_eq!(output(&["parse", "list<T>", "--template", "T:int"]), "list<T>\n");
}

#[test]
fn test_parse_json_description() {
    let out = output(&["parse", "?int", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).expect("json output");
    assert_eq!(value["nullable"], serde_json::Value::Bool(true));
    assert_eq!(value["explicit_nullable"], serde_json::Value::Bool(true));
    assert_eq!(value["atomics"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_parse_error_points_at_offset() {
    let err = run_cli(&["parse", "list<int>>"]).expect_err("trailing token should fail");
    let message = err.to_string();
    assert!(message.contains("offset 9"), "{message}");
    assert!(message.ends_with("         ^"), "{message}");
}

#[test]
fn test_parse_rejects_nameless_template() {
    assert!(run_cli(&["parse", "int", "--template", ":int"]).is_err());
}

#[test]
fn test_check_reports_containment() {
    assert_eq!(output(&["check", "int", "int|string"]), "contained\n");

    let (ok, out) = run_cli(&["check", "int|string", "int"]).expect("check should run");
    assert!(!ok);
    assert!(out.starts_with("not contained: "), "{out}");
}

#[test]
fn test_check_uses_manifest_hierarchy() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("decls.json");
    std::fs::write(&path, MANIFEST).expect("write manifest");
    let manifest = path.to_str().expect("utf-8 path");

    let (ok, _) = run_cli(&["check", "Dog", "Animal"]).expect("check should run");
    assert!(!ok);

    assert_eq!(
        output(&["check", "Dog", "Animal", "--manifest", manifest]),
        "contained\n"
    );
}

#[test]
fn test_syntax_renders_native_declarations() {
    assert_eq!(output(&["syntax", "int|null"]), "?int\n");
    assert_eq!(output(&["syntax", "list<int>"]), "array\n");
    assert_eq!(output(&["syntax", "App\\User", "--namespace", "App"]), "User\n");
    assert_eq!(output(&["syntax", "void", "--return"]), "void\n");
}

#[test]
fn test_syntax_respects_position_and_target() {
    assert!(run_cli(&["syntax", "void"]).is_err());
    assert!(run_cli(&["syntax", "never", "--return"]).is_err());
    assert_eq!(
        output(&["syntax", "never", "--return", "--target", "8.1"]),
        "never\n"
    );
}

#[test]
fn test_default_renders_literal_expression() {
    assert_eq!(output(&["default", "'abc'"]), "'abc'\n");
    assert_eq!(output(&["default", "false"]), "false\n");
    assert_eq!(
        output(&["default", "mixed"]),
        format!("{UNKNOWN_VALUE_PLACEHOLDER}\n")
    );
}

#[test]
fn test_stubs_written_to_output_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let manifest = dir.path().join("decls.json");
    let stubs = dir.path().join("stubs.php");
    std::fs::write(&manifest, MANIFEST).expect("write manifest");

    let out = output(&[
        "stubs",
        manifest.to_str().expect("utf-8 path"),
        "-o",
        stubs.to_str().expect("utf-8 path"),
    ]);
    assert!(out.is_empty());

    let written = std::fs::read_to_string(&stubs).expect("stubs written");
    assert!(written.starts_with("<?php\n"));
    assert!(written.contains("namespace App {"));
    assert!(written.contains("function first(array $items, bool $strict = false)"));
    assert!(written.contains("class Dog extends Animal"));
}

#[test]
fn test_stubs_missing_manifest_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.json");
    assert!(run_cli(&["stubs", missing.to_str().expect("utf-8 path")]).is_err());
}
