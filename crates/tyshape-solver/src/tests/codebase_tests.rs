use super::*;

fn hierarchy() -> Codebase {
    let mut builder = CodebaseBuilder::new();
    builder
        .add_classlike(ClassLikeStorage::new("App\\A", ClassLikeKind::Class).with_interfaces(["App\\I"]))
        .add_classlike(ClassLikeStorage::new("App\\B", ClassLikeKind::Class).with_parent("App\\A"))
        .add_classlike(ClassLikeStorage::new("App\\C", ClassLikeKind::Class).with_parent("\\App\\B"))
        .add_classlike(ClassLikeStorage::new("App\\I", ClassLikeKind::Interface))
        .add_classlike(
            ClassLikeStorage::new("App\\Suit", ClassLikeKind::Enum).with_cases(["Hearts", "Spades"]),
        );
    builder.build()
}

#[test]
fn test_ancestors_are_transitive_nearest_first() {
    let codebase = hierarchy();
    assert_eq!(
        codebase.ancestors("App\\C"),
        &["App\\B".to_string(), "App\\A".to_string(), "App\\I".to_string()]
    );
    assert!(codebase.ancestors("App\\Unknown").is_empty());
}

#[test]
fn test_lookups_are_case_insensitive() {
    let codebase = hierarchy();
    assert!(codebase.is_subtype_of("app\\c", "APP\\I"));
    assert!(codebase.is_subtype_of("\\App\\C", "App\\C"));
    assert!(!codebase.is_subtype_of("App\\A", "App\\B"));
    assert_eq!(codebase.kind("app\\i"), Some(ClassLikeKind::Interface));
}

#[test]
fn test_inheritance_cycle_terminates() {
    let mut builder = CodebaseBuilder::new();
    builder
        .add_classlike(ClassLikeStorage::new("X", ClassLikeKind::Class).with_parent("Y"))
        .add_classlike(ClassLikeStorage::new("Y", ClassLikeKind::Class).with_parent("X"));
    let codebase = builder.build();
    assert_eq!(codebase.ancestors("X"), &["Y".to_string()]);
    assert_eq!(codebase.ancestors("Y"), &["X".to_string()]);
}

#[test]
fn test_enum_cases_and_variance() {
    let mut builder = CodebaseBuilder::new();
    let mut invariant = TemplateDecl::new("T", TUnion::mixed());
    invariant.variance = Variance::Invariant;
    builder.add_classlike(
        ClassLikeStorage::new("Box", ClassLikeKind::Class).with_templates(vec![invariant]),
    );
    builder.add_classlike(ClassLikeStorage::new("Suit", ClassLikeKind::Enum).with_cases(["A"]));
    let codebase = builder.build();

    assert_eq!(codebase.generic_variance("box", 0), Variance::Invariant);
    assert_eq!(codebase.generic_variance("box", 1), Variance::Covariant);
    assert_eq!(codebase.enum_cases("suit"), Some(&["A".to_string()][..]));
    assert!(codebase.enum_cases("Box").is_none());
    assert!(codebase.is_enum("Suit"));
}

#[test]
fn test_first_function_registration_wins() {
    let mut builder = CodebaseBuilder::new();
    let mut first = FunctionLikeStorage::new("Ns\\run");
    first.throws.push("RuntimeException".to_string());
    builder.add_function(first);
    builder.add_function(FunctionLikeStorage::new("NS\\RUN"));
    let codebase = builder.build();

    assert_eq!(codebase.functions().count(), 1);
    let stored = codebase.get_function("ns\\run").expect("function registered");
    assert_eq!(stored.cased_name.as_deref(), Some("Ns\\run"));
    assert_eq!(stored.throws.len(), 1);
}
