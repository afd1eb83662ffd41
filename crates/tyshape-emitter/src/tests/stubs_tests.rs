use super::*;
use tyshape_parser::{ParserConfig, parse_type};
use tyshape_solver::{CodebaseBuilder, TAtomic, TemplateDecl};

fn ty(text: &str) -> TUnion {
    match parse_type(text, &ParserConfig::default()) {
        Ok(union) => union,
        Err(err) => panic!("`{text}` failed to parse: {err}"),
    }
}

fn function(name: &str) -> FunctionLikeStorage {
    FunctionLikeStorage::new(name)
}

fn generate(builder: CodebaseBuilder) -> String {
    let codebase = builder.build();
    match generate_stubs(&codebase, NativeTarget::default()) {
        Ok(output) => output,
        Err(err) => panic!("generation failed: {err}"),
    }
}

#[test]
fn test_namespaces_and_declarations_are_sorted() {
    let mut builder = CodebaseBuilder::new();
    builder
        .add_function(function("B\\b"))
        .add_function(function("A\\a2"))
        .add_function(function("A\\a1"));
    let output = generate(builder);

    let ns_a = output.find("namespace A {").expect("namespace A");
    let ns_b = output.find("namespace B {").expect("namespace B");
    assert!(ns_a < ns_b, "{output}");
    let a1 = output.find("function a1()").expect("a1");
    let a2 = output.find("function a2()").expect("a2");
    assert!(a1 < a2, "{output}");
    assert!(a2 < ns_b, "{output}");
}

#[test]
fn test_generation_is_idempotent() {
    let populate = |names: &[&str]| {
        let mut builder = CodebaseBuilder::new();
        for name in names {
            builder.add_function(function(name));
            builder.add_classlike(ClassLikeStorage::new(format!("{name}Class"), ClassLikeKind::Class));
            builder.add_constant(ConstantStorage::new(format!("{name}_CONST"), ty("1")));
        }
        builder.build()
    };
    let names = ["Z\\f", "A\\g", "M\\N\\h", "top", "A\\a"];
    let first = populate(&names[..]);
    let mut reversed = names;
    reversed.reverse();
    let second = populate(&reversed[..]);

    let once = generate_stubs(&first, NativeTarget::default()).expect("generates");
    let again = generate_stubs(&first, NativeTarget::default()).expect("generates");
    let reordered = generate_stubs(&second, NativeTarget::default()).expect("generates");
    assert_eq!(once, again);
    assert_eq!(once, reordered);
}

#[test]
fn test_function_with_docblock() {
    let mut load = function("App\\load");
    load.template_types = vec![TemplateDecl::new("T", TUnion::from_atomic(TAtomic::Object))];
    let ids = FunctionParamStorage::new("ids", Some(ty("list<int>")));
    let mut fresh = FunctionParamStorage::new("fresh", Some(ty("bool")));
    fresh.default_type = Some(ty("false"));
    load.params = vec![ids, fresh];
    load.return_type = Some(ty("?App\\User"));
    load.throws = vec!["App\\NotFound".to_string()];

    let mut builder = CodebaseBuilder::new();
    builder.add_function(load);
    let output = generate(builder);

    let expected = "\
<?php

namespace App {
    /**
     * @template T as object
     * @param list<int> $ids
     * @throws NotFound
     */
    function load(array $ids, bool $fresh = false): ?User
    {
    }
}
";
    assert_eq!(output, expected);
}

#[test]
fn test_unrepresentable_types_fall_back_to_docblock() {
    let mut open = function("io\\open");
    let mut rest = FunctionParamStorage::new("rest", Some(ty("int")));
    rest.by_ref = true;
    rest.is_variadic = true;
    open.params = vec![
        FunctionParamStorage::new("handle", Some(ty("resource"))),
        FunctionParamStorage::new("anything", None),
        rest,
    ];
    open.return_type = Some(ty("int|void"));

    let mut builder = CodebaseBuilder::new();
    builder.add_function(open);
    let output = generate(builder);

    assert!(output.contains("     * @param resource $handle\n"), "{output}");
    assert!(output.contains("     * @return int|void\n"), "{output}");
    assert!(
        output.contains("    function open($handle, $anything, int &...$rest)\n"),
        "{output}"
    );
}

#[test]
fn test_classlike_skeletons() {
    let mut builder = CodebaseBuilder::new();
    builder
        .add_classlike(
            ClassLikeStorage::new("App\\User", ClassLikeKind::Class)
                .with_parent("App\\Model")
                .with_interfaces(["JsonSerializable", "App\\Contracts\\HasId"]),
        )
        .add_classlike(
            ClassLikeStorage::new("App\\Contracts\\HasId", ClassLikeKind::Interface)
                .with_interfaces(["Countable", "Traversable"]),
        )
        .add_classlike(
            ClassLikeStorage::new("App\\Suit", ClassLikeKind::Enum)
                .with_interfaces(["UnitEnum"])
                .with_cases(["Hearts"]),
        )
        .add_classlike(ClassLikeStorage::new("App\\Greets", ClassLikeKind::Trait));
    let output = generate(builder);

    assert!(
        output.contains("    class User extends Model implements \\JsonSerializable, Contracts\\HasId\n    {\n    }\n"),
        "{output}"
    );
    assert!(
        output.contains("    interface HasId extends \\Countable, \\Traversable\n"),
        "{output}"
    );
    assert!(output.contains("    enum Suit implements \\UnitEnum\n"), "{output}");
    assert!(output.contains("    trait Greets\n"), "{output}");
    assert!(output.contains("namespace App\\Contracts {"), "{output}");
}

#[test]
fn test_global_namespace_and_constants() {
    let mut builder = CodebaseBuilder::new();
    builder
        .add_constant(ConstantStorage::new("DEBUG", ty("true")))
        .add_constant(ConstantStorage::new("App\\MODES", ty("list{'read', 'write'}")))
        .add_constant(ConstantStorage::new("App\\UNKNOWN", TUnion::mixed()));
    let output = generate(builder);

    assert!(output.contains("namespace {\n    const DEBUG = true;\n}\n"), "{output}");
    assert!(output.contains("    const MODES = ['read', 'write'];\n"), "{output}");
    assert!(!output.contains("UNKNOWN"), "{output}");
    assert!(output.find("namespace {") < output.find("namespace App {"));
}

#[test]
fn test_builtin_and_stubbed_declarations_are_skipped() {
    let mut builtin_class = ClassLikeStorage::new("ArrayObject", ClassLikeKind::Class);
    builtin_class.is_builtin = true;
    let mut stubbed_class = ClassLikeStorage::new("Vendor\\Thing", ClassLikeKind::Class);
    stubbed_class.is_stubbed = true;
    let mut builtin_function = function("strlen");
    builtin_function.is_builtin = true;
    let mut stubbed_function = function("Vendor\\helper");
    stubbed_function.is_stubbed = true;
    let mut builtin_constant = ConstantStorage::new("PHP_EOL", ty("'\\n'"));
    builtin_constant.is_builtin = true;

    let mut builder = CodebaseBuilder::new();
    builder
        .add_classlike(builtin_class)
        .add_classlike(stubbed_class)
        .add_function(builtin_function)
        .add_function(stubbed_function)
        .add_constant(builtin_constant);
    assert_eq!(generate(builder), "<?php\n");
}

#[test]
fn test_stubbed_constant_is_skipped() {
    let mut stubbed = ConstantStorage::new("Vendor\\LEVEL", ty("3"));
    stubbed.is_stubbed = true;

    let mut builder = CodebaseBuilder::new();
    builder
        .add_constant(stubbed)
        .add_constant(ConstantStorage::new("App\\LIMIT", ty("10")));
    let output = generate(builder);

    assert!(output.contains("const LIMIT = 10;"), "{output}");
    assert!(!output.contains("LEVEL"), "{output}");
    assert!(!output.contains("namespace Vendor"), "{output}");
}

#[test]
fn test_missing_function_name_aborts_generation() {
    let mut broken = function("App\\broken");
    broken.cased_name = None;
    let mut builder = CodebaseBuilder::new();
    builder.add_function(function("App\\fine")).add_function(broken);
    let codebase = builder.build();

    let err = StubGenerator::new(&codebase).generate().unwrap_err();
    assert_eq!(
        err,
        StubGenerationError::MissingFunctionName {
            id: "app\\broken".to_string()
        }
    );
}

#[test]
fn test_target_changes_native_forms() {
    let mut never_returns = function("fail");
    never_returns.return_type = Some(ty("never"));
    let mut builder = CodebaseBuilder::new();
    builder.add_function(never_returns);
    let codebase = builder.build();

    let old = StubGenerator::new(&codebase).generate().expect("generates");
    assert!(old.contains("     * @return never\n"), "{old}");
    assert!(old.contains("    function fail()\n"), "{old}");

    let new = StubGenerator::new(&codebase)
        .with_target(NativeTarget::PHP_8_1)
        .generate()
        .expect("generates");
    assert!(new.contains("    function fail(): never\n"), "{new}");
    assert!(!new.contains("@return"), "{new}");
}
