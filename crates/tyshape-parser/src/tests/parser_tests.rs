use super::*;
use rayon::prelude::*;
use tyshape_solver::{Codebase, TypeFormatter, is_contained_by};

fn parse(text: &str) -> TUnion {
    match parse_type(text, &ParserConfig::default()) {
        Ok(union) => union,
        Err(err) => panic!("`{text}` failed to parse: {err}"),
    }
}

fn contains(parent: &str, child: &str) -> bool {
    is_contained_by(&Codebase::empty(), &parse(child), &parse(parent))
}

#[test]
fn test_every_standalone_reserved_word_contains_itself() {
    let config = ParserConfig::default();
    let codebase = Codebase::empty();
    let mut checked = 0;
    for word in config.reserved_words.words() {
        if !word.is_standalone() {
            continue;
        }
        let union = match parse_type(word.name, &config) {
            Ok(union) => union,
            Err(err) => panic!("`{}` does not parse on its own: {err}", word.name),
        };
        assert!(
            is_contained_by(&codebase, &union, &union),
            "`{}` should contain itself",
            word.name
        );
        checked += 1;
    }
    assert!(checked > 50, "only {checked} words checked");
}

#[test]
fn test_allowed_children() {
    let cases = [
        ("iterable", "array"),
        ("list", "array<empty, empty>"),
        ("array", "array<empty, empty>"),
        ("array{foo?: string}", "array<empty, empty>"),
        ("array{foo?: string}&array<string, mixed>", "array<empty, empty>"),
        ("lowercase-string", "callable-string"),
    ];
    for (parent, child) in cases {
        assert!(contains(parent, child), "`{child}` should fit in `{parent}`");
    }
}

#[test]
fn test_rejected_children() {
    let cases = [
        ("array", "iterable"),
        ("non-empty-list", "array<empty, empty>"),
        ("array{foo: string}", "array<empty, empty>"),
        ("list<int>", "array<int, int>"),
        ("int<0, 10>", "int"),
        ("callable-string", "lowercase-string"),
        ("string", "?string"),
    ];
    for (parent, child) in cases {
        assert!(!contains(parent, child), "`{child}` should not fit in `{parent}`");
    }
}

#[test]
fn test_nullable_and_union_containment() {
    assert!(contains("?string", "string"));
    assert!(contains("?string", "null"));
    assert!(contains("int|string", "1|'a'"));
    assert!(contains("mixed", "array{a: int}|Foo|null"));
    assert!(contains("array<string, int>", "array{a: 1, b: 2}"));
    assert!(contains("list<int>", "array{1, 2}"));
}

#[test]
fn test_formatted_types_parse_back_to_equivalent_types() {
    let codebase = Codebase::empty();
    let formatter = TypeFormatter::new();
    let samples = [
        "int",
        "?string",
        "array<string, list<int>>",
        "array{a: int, 'b c'?: string, 7: null}",
        "list{int, string}",
        "array{a: int, ...<string, mixed>}",
        "non-empty-list<positive-int>",
        "int<-5, 10>",
        "int<min, 0>",
        "'foo'|1|2.5",
        "Foo::class",
        "class-string<Foo>",
        "Suit::Hearts",
        "callable(int, string=, int...): (int|string)",
        "pure-Closure(int): void",
        "Foo<int, string>&Bar",
        "iterable<int, string>",
        "array{}",
        "callable-array",
        "numeric|scalar",
        "resource",
        "static",
    ];
    for text in samples {
        let original = parse(text);
        let printed = formatter.format_union(&original);
        let reparsed = match parse_type(&printed, &ParserConfig::default()) {
            Ok(union) => union,
            Err(err) => panic!("`{text}` printed as `{printed}` which fails to parse: {err}"),
        };
        assert!(
            is_contained_by(&codebase, &original, &reparsed)
                && is_contained_by(&codebase, &reparsed, &original),
            "`{text}` printed as `{printed}` is not equivalent"
        );
    }
}

#[test]
fn test_errors_carry_kind_and_offset() {
    let config = ParserConfig::default();

    let err = parse_type("int-foo", &config).unwrap_err();
    assert_eq!(err.kind, TypeParseErrorKind::UnknownType);
    assert_eq!(err.offset(), 0);

    let err = parse_type("int&string", &config).unwrap_err();
    assert_eq!(err.kind, TypeParseErrorKind::IncompatibleIntersection);

    let err = parse_type("array<int,", &config).unwrap_err();
    assert!(err.is_syntax());

    let err = parse_type("list<int>>", &config).unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.offset(), 9);

    assert!(parse_type("", &config).unwrap_err().is_syntax());
    assert!(parse_type("'open", &config).unwrap_err().is_syntax());
}

#[test]
fn test_nesting_limit() {
    let config = ParserConfig {
        max_nesting_depth: 8,
        ..ParserConfig::default()
    };
    let shallow = "list<list<int>>";
    assert!(parse_type(shallow, &config).is_ok());

    let deep = format!("{}int{}", "list<".repeat(20), ">".repeat(20));
    let err = parse_type(&deep, &config).unwrap_err();
    assert!(err.message.contains("nested too deeply"), "{err}");
}

#[test]
fn test_scope_templates() {
    let config = ParserConfig::default();
    let scope = TypeScope::new()
        .with_template("TKey", "fn-map", TUnion::array_key())
        .with_template("TValue", "fn-map", TUnion::mixed());
    let union = parse_type_in_scope("array<TKey, TValue>", &config, &scope).expect("parses");
    assert!(union.has_template());

    let keys = parse_type_in_scope("key-of<array<TKey, TValue>>", &config, &scope).expect("parses");
    assert!(keys.has_template());
}

#[test]
fn test_parallel_parsing_shares_config() {
    let config = ParserConfig::default();
    let texts: Vec<String> = (0..256)
        .map(|i| format!("array{{id: int<0, {i}>, tags?: list<string>}}|null"))
        .collect();
    let parsed: Vec<TUnion> = texts
        .par_iter()
        .map(|text| parse_type(text, &config).expect("parses"))
        .collect();
    assert_eq!(parsed.len(), 256);
    assert!(parsed.iter().all(TUnion::is_nullable));
}
