use super::*;

#[test]
fn test_int_range_containment() {
    let small = TInt::new(Some(1), Some(5));
    assert!(TInt::UNBOUNDED.contains_range(&small));
    assert!(TInt::POSITIVE.contains_range(&small));
    assert!(TInt::NON_NEGATIVE.contains_range(&TInt::POSITIVE));
    assert!(!TInt::POSITIVE.contains_range(&TInt::NON_NEGATIVE));
    assert!(!small.contains_range(&TInt::UNBOUNDED));
    assert!(small.contains_value(5));
    assert!(!small.contains_value(0));
}

#[test]
fn test_array_key_literal_atomics() {
    assert_eq!(ArrayKey::Int(3).to_atomic(), TAtomic::literal_int(3));
    assert_eq!(
        ArrayKey::String("a".to_string()).to_atomic(),
        TAtomic::literal_string("a")
    );
}

#[test]
fn test_keyed_list_constructor_is_positional() {
    let keyed = TKeyedArray::list([TUnion::int(), TUnion::string()]);
    assert!(keyed.is_list);
    assert!(keyed.is_sealed());
    assert!(keyed.has_required());
    let keys: Vec<_> = keyed.properties.keys().cloned().collect();
    assert_eq!(keys, vec![ArrayKey::Int(0), ArrayKey::Int(1)]);
}

#[test]
fn test_has_template_looks_through_payloads() {
    let param = TAtomic::GenericParam(TGenericParam {
        name: "T".to_string(),
        defining_entity: "fn-foo".to_string(),
        as_type: TUnion::mixed(),
    });
    let list = TAtomic::list(TUnion::from_atomic(param.clone()));
    assert!(list.has_template());
    assert!(!TAtomic::named("Box").has_template());

    let boxed = TAtomic::NamedObject(
        TNamedObject::new("Box").with_params([TUnion::from_atomic(param)]),
    );
    assert!(boxed.has_template());
}

#[test]
fn test_intersection_parts_put_base_first() {
    let mut object = TNamedObject::new("A");
    object.extra_types.push(TAtomic::named("B"));
    let parts = object.intersection_parts();
    assert_eq!(parts, vec![TAtomic::named("A"), TAtomic::named("B")]);
}
