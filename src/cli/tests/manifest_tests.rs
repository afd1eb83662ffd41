use tyshape_parser::ParserConfig;
use tyshape_solver::{ClassLikeKind, ClassLikeLookup, TAtomic, Variance};

use super::manifest::{load_manifest, parse_manifest};

const MANIFEST: &str = r#"{
  "classes": [
    { "name": "App\\Model", "kind": "class" },
    { "name": "App\\User", "parent": "App\\Model", "interfaces": ["JsonSerializable"] },
    { "name": "App\\Box", "templates": [{ "name": "T", "as": "object", "variance": "invariant" }] },
    { "name": "App\\Suit", "kind": "enum", "cases": ["Hearts", "Spades"] }
  ],
  "functions": [
    {
      "name": "App\\first",
      "templates": [{ "name": "T" }],
      "params": [
        { "name": "items", "type": "list<T>" },
        { "name": "strict", "type": "bool", "default": "false" }
      ],
      "return_type": "T|null",
      "throws": ["App\\EmptyError"]
    }
  ],
  "constants": [{ "name": "App\\VERSION", "type": "'1.0'" }]
}"#;

#[test]
fn test_manifest_builds_class_hierarchy() {
    let manifest = parse_manifest(MANIFEST).expect("manifest should parse");
    let codebase = manifest.build_codebase(&ParserConfig::default());

    assert!(codebase.is_subtype_of("App\\User", "App\\Model"));
    assert!(codebase.is_subtype_of("App\\User", "JsonSerializable"));
    assert_eq!(codebase.kind("App\\Suit"), Some(ClassLikeKind::Enum));
    assert_eq!(codebase.generic_variance("App\\Box", 0), Variance::Invariant);

    let suit = codebase.get_classlike("App\\Suit").expect("enum registered");
    assert_eq!(suit.enum_cases, vec!["Hearts".to_string(), "Spades".to_string()]);
    let user = codebase.get_classlike("App\\User").expect("class registered");
    assert_eq!(user.kind, ClassLikeKind::Class);
}

#[test]
fn test_manifest_resolves_function_templates() {
    let manifest = parse_manifest(MANIFEST).expect("manifest should parse");
    let codebase = manifest.build_codebase(&ParserConfig::default());

    let function = codebase.get_function("App\\first").expect("function registered");
    assert_eq!(function.template_types.len(), 1);
    assert!(function.template_types[0].as_type.is_mixed());

    let items = function.params[0].ty.as_ref().expect("typed param");
    assert!(items.has_template());
    let return_type = function.return_type.as_ref().expect("return type");
    assert!(return_type.has_template());
    assert!(return_type.is_nullable());

    let strict = &function.params[1];
    assert_eq!(
        strict.default_type.as_ref().and_then(|ty| ty.get_single()),
        Some(&TAtomic::False)
    );
    assert_eq!(function.throws, vec!["App\\EmptyError".to_string()]);
}

#[test]
fn test_manifest_bad_annotation_degrades_to_mixed() {
    let manifest = parse_manifest(
        r#"{ "constants": [{ "name": "BROKEN", "type": "array<int" }] }"#,
    )
    .expect("manifest should parse");
    let codebase = manifest.build_codebase(&ParserConfig::default());

    let constant = codebase.get_constant("BROKEN").expect("constant registered");
    assert!(constant.ty.is_mixed());
    assert!(constant.ty.is_failed_resolution());
}

#[test]
fn test_manifest_rejects_unknown_fields() {
    let result = parse_manifest(r#"{ "classes": [{ "name": "A", "abstract": true }] }"#);
    assert!(result.is_err());
}

#[test]
fn test_manifest_sections_are_optional() {
    let manifest = parse_manifest("{}").expect("empty manifest should parse");
    assert!(manifest.classes.is_empty());
    assert!(manifest.functions.is_empty());
    assert!(manifest.constants.is_empty());
}

#[test]
fn test_load_manifest_reads_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("decls.json");
    std::fs::write(&path, MANIFEST).expect("write manifest");

    let manifest = load_manifest(&path).expect("manifest should load");
    assert_eq!(manifest.classes.len(), 4);
    assert_eq!(manifest.functions.len(), 1);
}

#[test]
fn test_load_manifest_missing_file_names_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing.json");

    let err = load_manifest(&path).expect_err("missing file should fail");
    assert!(format!("{err:#}").contains("missing.json"));
}
