//! Collection containment: arrays, lists, keyed shapes, iterables and the
//! empty collection.

use crate::diagnostics::{CollectionPosition, ContainmentFailure, ContainmentTracer};
use crate::subtype::{ContainmentChecker, explain_nested};
use crate::types::{
    ArrayKey, TArray, TAtomic, TInt, TIterable, TKeyedArray, TList, TNamedObject, TScalar,
};
use crate::union::TUnion;

/// Key type of every list: `non-negative-int`.
fn list_key() -> TUnion {
    TUnion::from_atomic(TAtomic::Scalar(TScalar::Int(TInt::NON_NEGATIVE)))
}

/// Key and value unions covering every entry of a shape.
fn keyed_params(keyed: &TKeyedArray) -> (TUnion, TUnion) {
    let mut keys: Vec<TAtomic> = keyed.properties.keys().map(ArrayKey::to_atomic).collect();
    let mut values: Vec<TAtomic> = keyed
        .properties
        .values()
        .flat_map(|prop| prop.ty.iter().cloned())
        .collect();
    if let Some((key, value)) = &keyed.fallback {
        keys.extend(key.iter().cloned());
        values.extend(value.iter().cloned());
    }
    (TUnion::new(keys), TUnion::new(values))
}

impl<T: ContainmentTracer> ContainmentChecker<'_, T> {
    /// `array<never, never>` fits any collection that may be empty.
    pub(crate) fn check_empty_array(&mut self, parent: &TAtomic) -> bool {
        match parent {
            TAtomic::Array(TArray { non_empty, .. }) | TAtomic::List(TList { non_empty, .. }) => {
                if *non_empty {
                    return self.fail(|| ContainmentFailure::PossiblyEmpty);
                }
                true
            }
            TAtomic::Iterable(_) | TAtomic::EmptyArray => true,
            TAtomic::KeyedArray(keyed) => {
                match keyed.properties.iter().find(|(_, prop)| !prop.optional) {
                    Some((key, _)) => {
                        let key = key.clone();
                        self.fail(|| ContainmentFailure::MissingRequiredKey { key })
                    }
                    None => true,
                }
            }
            _ => self.fail_pair(&TAtomic::EmptyArray, parent),
        }
    }

    pub(crate) fn check_array_like(&mut self, child: &TAtomic, parent: &TAtomic) -> bool {
        match (child, parent) {
            (TAtomic::Array(c), TAtomic::Array(p)) => {
                if p.non_empty && !c.non_empty {
                    return self.fail(|| ContainmentFailure::PossiblyEmpty);
                }
                self.check_collection_params(&c.key, &c.value, &p.key, &p.value)
            }
            (TAtomic::List(c), TAtomic::Array(p)) => {
                if p.non_empty && !c.non_empty {
                    return self.fail(|| ContainmentFailure::PossiblyEmpty);
                }
                self.check_collection_params(&list_key(), &c.value, &p.key, &p.value)
            }
            (TAtomic::KeyedArray(c), TAtomic::Array(p)) => {
                if p.non_empty && !c.has_required() {
                    return self.fail(|| ContainmentFailure::PossiblyEmpty);
                }
                let (key, value) = keyed_params(c);
                self.check_collection_params(&key, &value, &p.key, &p.value)
            }

            (TAtomic::Array(_), TAtomic::List(_)) => self.fail(|| ContainmentFailure::NotAList),
            (TAtomic::List(c), TAtomic::List(p)) => {
                if p.non_empty && !c.non_empty {
                    return self.fail(|| ContainmentFailure::PossiblyEmpty);
                }
                self.check_collection_value(&c.value, &p.value)
            }
            (TAtomic::KeyedArray(c), TAtomic::List(p)) => {
                if !c.is_list {
                    return self.fail(|| ContainmentFailure::NotAList);
                }
                if p.non_empty && !c.has_required() {
                    return self.fail(|| ContainmentFailure::PossiblyEmpty);
                }
                let (_, value) = keyed_params(c);
                self.check_collection_value(&value, &p.value)
            }

            (TAtomic::KeyedArray(c), TAtomic::KeyedArray(p)) => self.check_keyed_array(c, p),
            (TAtomic::Array(c), TAtomic::KeyedArray(p)) => {
                self.check_generic_in_keyed(&c.key, &c.value, false, p)
            }
            (TAtomic::List(c), TAtomic::KeyedArray(p)) => {
                self.check_generic_in_keyed(&list_key(), &c.value, true, p)
            }

            (TAtomic::Array(c), TAtomic::Iterable(p)) => {
                self.check_collection_params(&c.key, &c.value, &p.key, &p.value)
            }
            (TAtomic::List(c), TAtomic::Iterable(p)) => {
                self.check_collection_params(&list_key(), &c.value, &p.key, &p.value)
            }
            (TAtomic::KeyedArray(c), TAtomic::Iterable(p)) => {
                let (key, value) = keyed_params(c);
                self.check_collection_params(&key, &value, &p.key, &p.value)
            }

            _ => self.fail_pair(child, parent),
        }
    }

    pub(crate) fn check_iterable(&mut self, child: &TIterable, parent: &TIterable) -> bool {
        self.check_collection_params(&child.key, &child.value, &parent.key, &parent.value)
    }

    /// Traversable objects are iterables; their type arguments supply key/value.
    pub(crate) fn check_traversable(&mut self, child: &TNamedObject, parent: &TIterable) -> bool {
        if !self.codebase.is_subtype_of(&child.name, "Traversable") {
            return self.fail(|| ContainmentFailure::NotASubclass {
                child: child.name.clone(),
                parent: "Traversable".to_string(),
            });
        }
        let (key, value) = match child.type_params.as_slice() {
            [key, value, ..] => (key.clone(), value.clone()),
            [value] => (TUnion::mixed(), value.clone()),
            [] => (TUnion::mixed(), TUnion::mixed()),
        };
        self.check_collection_params(&key, &value, &parent.key, &parent.value)
    }

    fn check_collection_params(
        &mut self,
        child_key: &TUnion,
        child_value: &TUnion,
        parent_key: &TUnion,
        parent_value: &TUnion,
    ) -> bool {
        if !self.union_fits(child_key, parent_key) {
            let (codebase, depth) = (self.codebase, self.depth);
            return self.fail(|| ContainmentFailure::CollectionParamMismatch {
                position: CollectionPosition::Key,
                nested: explain_nested(codebase, depth, child_key, parent_key),
            });
        }
        self.check_collection_value(child_value, parent_value)
    }

    fn check_collection_value(&mut self, child_value: &TUnion, parent_value: &TUnion) -> bool {
        if !self.union_fits(child_value, parent_value) {
            let (codebase, depth) = (self.codebase, self.depth);
            return self.fail(|| ContainmentFailure::CollectionParamMismatch {
                position: CollectionPosition::Value,
                nested: explain_nested(codebase, depth, child_value, parent_value),
            });
        }
        true
    }

    /// Property-by-property shape containment.
    ///
    /// Every required parent key must be declared by the child (optional or
    /// not) with a fitting type. Child keys the parent does not declare are
    /// only allowed by an open parent, against its fallback types.
    fn check_keyed_array(&mut self, child: &TKeyedArray, parent: &TKeyedArray) -> bool {
        if parent.is_list && !child.is_list {
            return self.fail(|| ContainmentFailure::NotAList);
        }

        for (key, parent_prop) in &parent.properties {
            match child.properties.get(key) {
                Some(child_prop) => {
                    if !self.union_fits(&child_prop.ty, &parent_prop.ty) {
                        return self.fail_property(key, &child_prop.ty, &parent_prop.ty);
                    }
                }
                None if parent_prop.optional => {
                    // Open child entries may still land on this key.
                    if let Some((fallback_key, fallback_value)) = &child.fallback {
                        let key_union = TUnion::from_atomic(key.to_atomic());
                        if self.union_fits(&key_union, fallback_key)
                            && !self.union_fits(fallback_value, &parent_prop.ty)
                        {
                            return self.fail_property(key, fallback_value, &parent_prop.ty);
                        }
                    }
                }
                None => {
                    let key = key.clone();
                    return self.fail(|| ContainmentFailure::MissingRequiredKey { key });
                }
            }
        }

        for (key, child_prop) in &child.properties {
            if parent.properties.contains_key(key) {
                continue;
            }
            let Some((fallback_key, fallback_value)) = &parent.fallback else {
                let key = key.clone();
                return self.fail(|| ContainmentFailure::UnexpectedKey { key });
            };
            let key_union = TUnion::from_atomic(key.to_atomic());
            if !self.union_fits(&key_union, fallback_key) {
                let key = key.clone();
                return self.fail(|| ContainmentFailure::UnexpectedKey { key });
            }
            if !self.union_fits(&child_prop.ty, fallback_value) {
                return self.fail_property(key, &child_prop.ty, fallback_value);
            }
        }

        match (&child.fallback, &parent.fallback) {
            (None, _) => true,
            (Some(_), None) => self.fail(|| ContainmentFailure::OpenShapeIntoSealed),
            (Some((child_key, child_value)), Some((parent_key, parent_value))) => {
                self.check_collection_params(child_key, child_value, parent_key, parent_value)
            }
        }
    }

    /// `array<K, V>` or `list<V>` against a shape: only an open shape with no
    /// required keys can accept an arbitrary collection.
    fn check_generic_in_keyed(
        &mut self,
        key: &TUnion,
        value: &TUnion,
        child_is_list: bool,
        parent: &TKeyedArray,
    ) -> bool {
        if parent.is_list && !child_is_list {
            return self.fail(|| ContainmentFailure::NotAList);
        }
        if let Some((required, _)) = parent.properties.iter().find(|(_, prop)| !prop.optional) {
            let key = required.clone();
            return self.fail(|| ContainmentFailure::MissingRequiredKey { key });
        }
        let Some((fallback_key, fallback_value)) = &parent.fallback else {
            return self.fail(|| ContainmentFailure::OpenShapeIntoSealed);
        };
        for (prop_key, prop) in &parent.properties {
            if !self.union_fits(value, &prop.ty) {
                return self.fail_property(prop_key, value, &prop.ty);
            }
        }
        self.check_collection_params(key, value, fallback_key, fallback_value)
    }

    fn fail_property(&mut self, key: &ArrayKey, child: &TUnion, parent: &TUnion) -> bool {
        let (codebase, depth) = (self.codebase, self.depth);
        self.fail(|| ContainmentFailure::PropertyTypeMismatch {
            key: key.clone(),
            nested: explain_nested(codebase, depth, child, parent),
        })
    }
}
