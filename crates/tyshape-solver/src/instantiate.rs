//! Template substitution.
//!
//! Replacing template parameters never mutates: it rebuilds every atomic
//! that mentions a bound parameter and returns a new union.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tyshape_common::names::normalize_name;

use crate::types::{
    CallableParam, CallableSignature, TArray, TAtomic, TCallable, TGenericParam, TIterable,
    TKeyedArray, TList, TNamedObject, TProperty, TScalar,
};
use crate::union::TUnion;

/// Bindings from (template name, defining entity) to a concrete type.
#[derive(Clone, Debug, Default)]
pub struct TemplateBindings {
    map: FxHashMap<(String, String), TUnion>,
}

impl TemplateBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, defining_entity: &str, ty: TUnion) {
        self.map
            .insert((name.to_string(), normalize_name(defining_entity)), ty);
    }

    pub fn get(&self, name: &str, defining_entity: &str) -> Option<&TUnion> {
        self.map
            .get(&(name.to_string(), normalize_name(defining_entity)))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn lookup(&self, param: &TGenericParam) -> Option<&TUnion> {
        self.get(&param.name, &param.defining_entity)
    }
}

pub fn replace_templates(union: &TUnion, bindings: &TemplateBindings) -> TUnion {
    if bindings.is_empty() || !union.has_template() {
        return union.clone();
    }

    let mut types = Vec::with_capacity(union.len());
    for atomic in union {
        match atomic {
            TAtomic::GenericParam(param) => match bindings.lookup(param) {
                Some(bound) => types.extend(bound.iter().cloned()),
                None => types.push(replace_atomic(atomic, bindings)),
            },
            TAtomic::Scalar(TScalar::ClassString {
                kind,
                bound: Some(bound),
            }) if matches!(bound.as_ref(), TAtomic::GenericParam(_)) => {
                let TAtomic::GenericParam(param) = bound.as_ref() else {
                    continue;
                };
                match bindings.lookup(param) {
                    Some(replacement) => {
                        for replacement_atomic in replacement {
                            let bound = match replacement_atomic {
                                TAtomic::NamedObject(_) | TAtomic::GenericParam(_) => {
                                    Some(Box::new(replacement_atomic.clone()))
                                }
                                _ => None,
                            };
                            types.push(TAtomic::Scalar(TScalar::ClassString {
                                kind: *kind,
                                bound,
                            }));
                        }
                    }
                    None => types.push(atomic.clone()),
                }
            }
            _ => types.push(replace_atomic(atomic, bindings)),
        }
    }

    TUnion::new(types).with_flags(union.flags())
}

fn replace_atomic(atomic: &TAtomic, bindings: &TemplateBindings) -> TAtomic {
    if !atomic.has_template() {
        return atomic.clone();
    }

    let replace = |union: &TUnion| replace_templates(union, bindings);

    match atomic {
        TAtomic::Array(array) => TAtomic::Array(TArray {
            key: replace(&array.key),
            value: replace(&array.value),
            non_empty: array.non_empty,
        }),
        TAtomic::List(list) => TAtomic::List(TList {
            value: replace(&list.value),
            non_empty: list.non_empty,
        }),
        TAtomic::Iterable(iterable) => TAtomic::Iterable(TIterable {
            key: replace(&iterable.key),
            value: replace(&iterable.value),
        }),
        TAtomic::KeyedArray(keyed) => TAtomic::KeyedArray(TKeyedArray {
            properties: keyed
                .properties
                .iter()
                .map(|(key, prop)| {
                    (
                        key.clone(),
                        TProperty {
                            ty: replace(&prop.ty),
                            optional: prop.optional,
                        },
                    )
                })
                .collect(),
            is_list: keyed.is_list,
            fallback: keyed
                .fallback
                .as_ref()
                .map(|(key, value)| (replace(key), replace(value))),
        }),
        TAtomic::NamedObject(object) => TAtomic::NamedObject(TNamedObject {
            name: object.name.clone(),
            type_params: object
                .type_params
                .iter()
                .map(replace)
                .collect::<SmallVec<_>>(),
            is_static: object.is_static,
            extra_types: object
                .extra_types
                .iter()
                .map(|extra| replace_atomic(extra, bindings))
                .collect(),
        }),
        TAtomic::Callable(callable) => TAtomic::Callable(TCallable {
            kind: callable.kind,
            is_pure: callable.is_pure,
            signature: callable.signature.as_ref().map(|sig| CallableSignature {
                params: sig
                    .params
                    .iter()
                    .map(|param| CallableParam {
                        ty: param.ty.as_ref().map(replace),
                        ..param.clone()
                    })
                    .collect(),
                return_type: sig.return_type.as_ref().map(replace),
            }),
        }),
        TAtomic::GenericParam(param) => TAtomic::GenericParam(TGenericParam {
            name: param.name.clone(),
            defining_entity: param.defining_entity.clone(),
            as_type: replace(&param.as_type),
        }),
        _ => atomic.clone(),
    }
}

#[cfg(test)]
#[path = "tests/instantiate_tests.rs"]
mod tests;
