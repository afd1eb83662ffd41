use super::*;
use crate::codebase::{ClassLikeKind, ClassLikeStorage, Codebase, CodebaseBuilder, TemplateDecl};
use crate::types::{
    ArrayKey, CallableParam, CallableSignature, ClassStringKind, TArray, TCallable, TGenericParam, TInt,
    TKeyedArray, TList, TNamedObject, TProperty, Variance,
};
use indexmap::IndexMap;

fn u(atomics: Vec<TAtomic>) -> TUnion {
    TUnion::new(atomics)
}

fn shape(entries: Vec<(&str, TUnion, bool)>) -> TAtomic {
    let properties: IndexMap<ArrayKey, TProperty> = entries
        .into_iter()
        .map(|(key, ty, optional)| (ArrayKey::String(key.to_string()), TProperty { ty, optional }))
        .collect();
    TAtomic::KeyedArray(TKeyedArray::new(properties, false))
}

fn contained(child: TAtomic, parent: TAtomic) -> bool {
    is_contained_by(&Codebase::empty(), &child.into(), &parent.into())
}

fn string_kind(refinement: StringRefinement) -> TAtomic {
    TAtomic::Scalar(TScalar::String(refinement))
}

fn sample_codebase() -> Codebase {
    let mut builder = CodebaseBuilder::new();
    let mut invariant = TemplateDecl::new("T", TUnion::mixed());
    invariant.variance = Variance::Invariant;
    builder
        .add_classlike(ClassLikeStorage::new("Base", ClassLikeKind::Class))
        .add_classlike(ClassLikeStorage::new("Child", ClassLikeKind::Class).with_parent("Base"))
        .add_classlike(
            ClassLikeStorage::new("Box", ClassLikeKind::Class)
                .with_templates(vec![TemplateDecl::new("T", TUnion::mixed())]),
        )
        .add_classlike(
            ClassLikeStorage::new("Cell", ClassLikeKind::Class).with_templates(vec![invariant]),
        )
        .add_classlike(ClassLikeStorage::new("Countable", ClassLikeKind::Interface))
        .add_classlike(
            ClassLikeStorage::new("Suit", ClassLikeKind::Enum)
                .with_interfaces(["UnitEnum"])
                .with_cases(["Hearts", "Spades"]),
        )
        .add_classlike(ClassLikeStorage::new("UnitEnum", ClassLikeKind::Interface))
        .add_classlike(ClassLikeStorage::new("Traversable", ClassLikeKind::Interface))
        .add_classlike(
            ClassLikeStorage::new("ArrayIterator", ClassLikeKind::Class)
                .with_interfaces(["Traversable"]),
        );
    builder.build()
}

// =============================================================================
// Union rule
// =============================================================================

#[test]
fn test_every_child_member_needs_some_parent_member() {
    let codebase = Codebase::empty();
    let int_or_string = u(vec![TAtomic::int(), TAtomic::string()]);
    assert!(is_contained_by(&codebase, &TUnion::int(), &int_or_string));
    assert!(!is_contained_by(&codebase, &int_or_string, &TUnion::int()));
    assert!(is_contained_by(&codebase, &int_or_string, &int_or_string));
}

#[test]
fn test_mixed_is_top_and_never_is_bottom() {
    let codebase = Codebase::empty();
    assert!(is_contained_by(&codebase, &TUnion::int(), &TUnion::mixed()));
    assert!(is_contained_by(&codebase, &TUnion::mixed(), &TUnion::mixed()));
    assert!(!is_contained_by(&codebase, &TUnion::mixed(), &TUnion::int()));
    assert!(!is_contained_by(
        &codebase,
        &TUnion::mixed(),
        &u(vec![TAtomic::int(), TAtomic::Null])
    ));
    assert!(is_contained_by(&codebase, &TUnion::never(), &TUnion::int()));
}

#[test]
fn test_bool_expands_to_true_and_false() {
    let codebase = Codebase::empty();
    let true_or_false = TUnion::from_atomic(TAtomic::True).combine(&TUnion::from_atomic(TAtomic::Null));
    assert!(!is_contained_by(&codebase, &TUnion::from_atomic(TAtomic::bool()), &true_or_false));
    assert!(is_atomic_contained_by(&codebase, &TAtomic::True, &TAtomic::bool()));
    assert!(is_contained_by(
        &codebase,
        &TUnion::array_key(),
        &u(vec![TAtomic::int(), TAtomic::string()])
    ));
}

// =============================================================================
// Scalars
// =============================================================================

#[test]
fn test_literals_and_refinements() {
    assert!(contained(TAtomic::literal_string("strlen"), string_kind(StringRefinement::Lowercase)));
    assert!(contained(TAtomic::literal_string("strlen"), string_kind(StringRefinement::Callable)));
    assert!(!contained(TAtomic::literal_string("Foo"), string_kind(StringRefinement::Lowercase)));
    assert!(contained(
        string_kind(StringRefinement::Callable),
        string_kind(StringRefinement::Lowercase)
    ));
    assert!(!contained(
        string_kind(StringRefinement::Lowercase),
        string_kind(StringRefinement::Callable)
    ));
    assert!(contained(TAtomic::literal_string("12"), TAtomic::Scalar(TScalar::Numeric)));
    assert!(contained(TAtomic::literal_float(1.5), TAtomic::float()));
    assert!(!contained(TAtomic::literal_float(1.5), TAtomic::int()));
}

#[test]
fn test_int_ranges_and_literals() {
    let positive = TAtomic::Scalar(TScalar::Int(TInt::POSITIVE));
    let small = TAtomic::Scalar(TScalar::Int(TInt::new(Some(1), Some(10))));
    assert!(contained(positive.clone(), TAtomic::int()));
    assert!(!contained(TAtomic::int(), positive.clone()));
    assert!(contained(small.clone(), positive));
    assert!(contained(TAtomic::literal_int(5), small.clone()));
    assert!(!contained(TAtomic::literal_int(11), small));
    assert!(contained(TAtomic::literal_int(0), TAtomic::array_key()));
}

#[test]
fn test_scalar_lattice() {
    assert!(contained(TAtomic::int(), TAtomic::Scalar(TScalar::Scalar)));
    assert!(contained(TAtomic::array_key(), TAtomic::Scalar(TScalar::Scalar)));
    assert!(contained(TAtomic::float(), TAtomic::Scalar(TScalar::Numeric)));
    assert!(!contained(TAtomic::string(), TAtomic::Scalar(TScalar::Numeric)));
    assert!(!contained(TAtomic::Scalar(TScalar::Scalar), TAtomic::array_key()));
}

#[test]
fn test_class_literals() {
    let codebase = sample_codebase();
    let class_string_of_base = TAtomic::Scalar(TScalar::ClassString {
        kind: ClassStringKind::Class,
        bound: Some(Box::new(TAtomic::named("Base"))),
    });
    let child_literal = TAtomic::Literal(TLiteral::ClassString("Child".to_string()));
    assert!(is_atomic_contained_by(&codebase, &child_literal, &class_string_of_base));
    assert!(!is_atomic_contained_by(
        &codebase,
        &TAtomic::Literal(TLiteral::ClassString("Suit".to_string())),
        &class_string_of_base
    ));
    assert!(is_atomic_contained_by(&codebase, &child_literal, &TAtomic::string()));
    assert!(is_atomic_contained_by(
        &codebase,
        &TAtomic::Literal(TLiteral::ClassString("Countable".to_string())),
        &TAtomic::Scalar(TScalar::ClassString {
            kind: ClassStringKind::Interface,
            bound: None,
        })
    ));
}

// =============================================================================
// Collections
// =============================================================================

#[test]
fn test_empty_array_fits_every_possibly_empty_collection() {
    let array = TAtomic::array(TUnion::array_key(), TUnion::mixed());
    let list = TAtomic::list(TUnion::mixed());
    let iterable = TAtomic::Iterable(crate::types::TIterable {
        key: TUnion::mixed(),
        value: TUnion::mixed(),
    });
    let optional_shape = shape(vec![("foo", TUnion::string(), true)]);

    assert!(contained(TAtomic::EmptyArray, array));
    assert!(contained(TAtomic::EmptyArray, list));
    assert!(contained(TAtomic::EmptyArray, iterable));
    assert!(contained(TAtomic::EmptyArray, optional_shape));
}

#[test]
fn test_empty_array_rejected_by_required_keys_and_non_empty() {
    let required_shape = shape(vec![("foo", TUnion::string(), false)]);
    let non_empty = TAtomic::Array(TArray {
        key: TUnion::array_key(),
        value: TUnion::mixed(),
        non_empty: true,
    });
    assert!(!contained(TAtomic::EmptyArray.clone(), required_shape.clone()));
    assert!(!contained(TAtomic::EmptyArray, non_empty));

    let failure = explain_containment(
        &Codebase::empty(),
        &TAtomic::EmptyArray.into(),
        &required_shape.into(),
    );
    assert_eq!(
        failure,
        Some(ContainmentFailure::MissingRequiredKey {
            key: ArrayKey::String("foo".to_string())
        })
    );
}

#[test]
fn test_list_is_an_array_but_not_vice_versa() {
    let list_of_int = TAtomic::list(TUnion::int());
    let array_of_int = TAtomic::array(TUnion::int(), TUnion::int());
    assert!(contained(list_of_int.clone(), array_of_int.clone()));
    assert!(!contained(array_of_int, list_of_int.clone()));

    let non_empty_list = TAtomic::List(TList {
        value: TUnion::int(),
        non_empty: true,
    });
    assert!(contained(non_empty_list.clone(), list_of_int.clone()));
    assert!(!contained(list_of_int, non_empty_list));
}

#[test]
fn test_positional_shape_is_a_list() {
    let tuple = TAtomic::KeyedArray(TKeyedArray::list([TUnion::int(), TUnion::int()]));
    assert!(contained(tuple.clone(), TAtomic::list(TUnion::int())));
    assert!(!contained(tuple, TAtomic::list(TUnion::string())));

    let keyed = shape(vec![("a", TUnion::int(), false)]);
    assert!(!contained(keyed, TAtomic::list(TUnion::int())));
}

#[test]
fn test_shape_fits_generic_array_when_values_fit() {
    let keyed = shape(vec![("a", TUnion::int(), false), ("b", TUnion::int(), true)]);
    assert!(contained(
        keyed.clone(),
        TAtomic::array(TUnion::string(), TUnion::int())
    ));
    assert!(!contained(keyed, TAtomic::array(TUnion::int(), TUnion::int())));
}

#[test]
fn test_shape_against_shape() {
    let parent = shape(vec![("a", TUnion::int(), false), ("b", TUnion::string(), true)]);

    // optional key of the parent may be absent
    assert!(contained(shape(vec![("a", TUnion::int(), false)]), parent.clone()));
    // declared key (even optional) satisfies a required parent key
    assert!(contained(shape(vec![("a", TUnion::int(), true)]), parent.clone()));
    // wrong property type
    assert!(!contained(shape(vec![("a", TUnion::string(), false)]), parent.clone()));
    // missing required key
    assert!(!contained(shape(vec![("b", TUnion::string(), false)]), parent.clone()));
    // unexpected key into a sealed parent
    let extra = shape(vec![("a", TUnion::int(), false), ("c", TUnion::int(), false)]);
    let failure = explain_containment(&Codebase::empty(), &extra.clone().into(), &parent.clone().into());
    assert_eq!(
        failure,
        Some(ContainmentFailure::UnexpectedKey {
            key: ArrayKey::String("c".to_string())
        })
    );

    // ...allowed once the parent is open
    let TAtomic::KeyedArray(mut open) = parent else {
        panic!("expected shape");
    };
    open.fallback = Some((TUnion::string(), TUnion::mixed()));
    assert!(contained(extra, TAtomic::KeyedArray(open)));
}

#[test]
fn test_property_mismatch_is_explained() {
    let parent = shape(vec![("a", TUnion::int(), false)]);
    let child = shape(vec![("a", TUnion::string(), false)]);
    let failure = explain_containment(&Codebase::empty(), &child.into(), &parent.into());
    match failure {
        Some(ContainmentFailure::PropertyTypeMismatch { key, nested }) => {
            assert_eq!(key, ArrayKey::String("a".to_string()));
            assert!(nested.is_some());
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_collections_are_iterables() {
    let iterable = TAtomic::Iterable(crate::types::TIterable {
        key: TUnion::mixed(),
        value: TUnion::int(),
    });
    assert!(contained(TAtomic::array(TUnion::array_key(), TUnion::int()), iterable.clone()));
    assert!(contained(TAtomic::list(TUnion::int()), iterable.clone()));
    assert!(!contained(TAtomic::list(TUnion::string()), iterable));
}

// =============================================================================
// Objects
// =============================================================================

#[test]
fn test_nominal_ancestry() {
    let codebase = sample_codebase();
    assert!(is_atomic_contained_by(&codebase, &TAtomic::named("Child"), &TAtomic::named("Base")));
    assert!(is_atomic_contained_by(&codebase, &TAtomic::named("child"), &TAtomic::named("BASE")));
    assert!(!is_atomic_contained_by(&codebase, &TAtomic::named("Base"), &TAtomic::named("Child")));
    assert!(is_atomic_contained_by(&codebase, &TAtomic::named("Base"), &TAtomic::Object));
    assert!(!is_atomic_contained_by(&codebase, &TAtomic::Object, &TAtomic::named("Base")));
}

#[test]
fn test_type_arguments_follow_declared_variance() {
    let codebase = sample_codebase();
    let generic = |name: &str, arg: &str| {
        TAtomic::NamedObject(TNamedObject::new(name).with_params([TUnion::from_atomic(TAtomic::named(arg))]))
    };

    assert!(is_atomic_contained_by(&codebase, &generic("Box", "Child"), &generic("Box", "Base")));
    assert!(!is_atomic_contained_by(&codebase, &generic("Box", "Base"), &generic("Box", "Child")));
    assert!(!is_atomic_contained_by(&codebase, &generic("Cell", "Child"), &generic("Cell", "Base")));
    assert!(is_atomic_contained_by(&codebase, &generic("Cell", "Base"), &generic("Cell", "Base")));
    assert!(is_atomic_contained_by(&codebase, &generic("Box", "Child"), &TAtomic::named("Box")));
}

#[test]
fn test_intersections() {
    let codebase = sample_codebase();
    let mut both = TNamedObject::new("Child");
    both.extra_types.push(TAtomic::named("Countable"));
    let both = TAtomic::NamedObject(both);

    assert!(is_atomic_contained_by(&codebase, &both, &TAtomic::named("Base")));
    assert!(is_atomic_contained_by(&codebase, &both, &TAtomic::named("Countable")));
    assert!(!is_atomic_contained_by(&codebase, &TAtomic::named("Child"), &both));
}

#[test]
fn test_enum_cases() {
    let codebase = sample_codebase();
    let hearts = TAtomic::enum_case("Suit", "Hearts");
    let spades = TAtomic::enum_case("Suit", "Spades");

    assert!(is_atomic_contained_by(&codebase, &hearts, &TAtomic::named("Suit")));
    assert!(is_atomic_contained_by(&codebase, &hearts, &TAtomic::named("UnitEnum")));
    assert!(is_atomic_contained_by(&codebase, &hearts, &hearts));
    assert!(!is_atomic_contained_by(&codebase, &hearts, &spades));

    // the enum is exactly the union of its cases
    let all_cases = u(vec![hearts.clone(), spades]);
    assert!(is_contained_by(&codebase, &TAtomic::named("Suit").into(), &all_cases));
    assert!(!is_contained_by(&codebase, &TAtomic::named("Suit").into(), &hearts.into()));
}

#[test]
fn test_traversable_objects_are_iterable() {
    let codebase = sample_codebase();
    let iterable = TAtomic::Iterable(crate::types::TIterable {
        key: TUnion::mixed(),
        value: TUnion::mixed(),
    });
    assert!(is_atomic_contained_by(&codebase, &TAtomic::named("ArrayIterator"), &iterable));
    assert!(!is_atomic_contained_by(&codebase, &TAtomic::named("Base"), &iterable));
}

// =============================================================================
// Templates and callables
// =============================================================================

#[test]
fn test_template_parameter_uses_its_constraint() {
    let param = TAtomic::GenericParam(TGenericParam {
        name: "T".to_string(),
        defining_entity: "fn-f".to_string(),
        as_type: TUnion::int(),
    });
    assert!(contained(param.clone(), TAtomic::int()));
    assert!(contained(param.clone(), param.clone()));
    assert!(!contained(TAtomic::int(), param));
}

#[test]
fn test_callable_parameters_are_contravariant() {
    let callable = |param: TUnion, ret: TUnion| {
        TAtomic::Callable(TCallable {
            kind: CallableKind::Callable,
            is_pure: false,
            signature: Some(CallableSignature {
                params: vec![CallableParam::new(param)],
                return_type: Some(ret),
            }),
        })
    };
    let wide_param = callable(TUnion::mixed(), TUnion::int());
    let narrow_param = callable(TUnion::int(), u(vec![TAtomic::int(), TAtomic::string()]));

    assert!(contained(wide_param.clone(), narrow_param.clone()));
    assert!(!contained(narrow_param, wide_param.clone()));
    assert!(contained(wide_param, TAtomic::Callable(TCallable::plain(CallableKind::Callable))));
}

#[test]
fn test_callable_strings_and_closures() {
    let any_callable = TAtomic::Callable(TCallable::plain(CallableKind::Callable));
    assert!(contained(TAtomic::literal_string("strlen"), any_callable.clone()));
    assert!(!contained(TAtomic::literal_string("not a name"), any_callable.clone()));
    assert!(contained(string_kind(StringRefinement::Callable), any_callable.clone()));

    let closure = TAtomic::Callable(TCallable::plain(CallableKind::Closure));
    assert!(contained(closure.clone(), any_callable.clone()));
    assert!(contained(closure.clone(), TAtomic::Object));
    assert!(contained(closure.clone(), TAtomic::named("Closure")));
    assert!(!contained(any_callable, closure));

    let mut pure = TCallable::plain(CallableKind::Callable);
    pure.is_pure = true;
    assert!(!contained(
        TAtomic::Callable(TCallable::plain(CallableKind::Callable)),
        TAtomic::Callable(pure)
    ));
}

#[test]
fn test_explain_returns_none_when_contained() {
    assert_eq!(
        explain_containment(&Codebase::empty(), &TUnion::int(), &TUnion::mixed()),
        None
    );
    let failure = explain_containment(&Codebase::empty(), &TUnion::string(), &TUnion::int());
    assert!(matches!(failure, Some(ContainmentFailure::NoMatchingAlternative { .. })));
}
