//! Callable containment.
//!
//! Parameters are contravariant, the return type is covariant. A pure parent
//! requires a pure child. Callable strings, callable arrays and `Closure`
//! objects meet the plain `callable` type here.

use indexmap::IndexMap;

use crate::diagnostics::{ContainmentFailure, ContainmentTracer};
use crate::refinement::is_callable_string;
use crate::subtype::ContainmentChecker;
use crate::types::{
    ArrayKey, CallableKind, CallableSignature, ClassStringKind, StringRefinement, TAtomic,
    TCallable, TKeyedArray, TLiteral, TProperty, TScalar,
};
use crate::union::TUnion;

/// `list{class-string|object, non-empty-string}`: the shape of a callable array.
fn callable_array_shape() -> TAtomic {
    let mut properties = IndexMap::new();
    properties.insert(
        ArrayKey::Int(0),
        TProperty::required(TUnion::new(vec![
            TAtomic::Scalar(TScalar::ClassString {
                kind: ClassStringKind::Class,
                bound: None,
            }),
            TAtomic::Object,
        ])),
    );
    properties.insert(
        ArrayKey::Int(1),
        TProperty::required(TUnion::from_atomic(TAtomic::Scalar(TScalar::String(
            StringRefinement::NonEmpty,
        )))),
    );
    TAtomic::KeyedArray(TKeyedArray::new(properties, true))
}

fn accepts_any_callable(parent: &TCallable) -> bool {
    parent.kind == CallableKind::Callable && !parent.is_pure && parent.signature.is_none()
}

impl<T: ContainmentTracer> ContainmentChecker<'_, T> {
    /// A callable atomic as the child.
    pub(crate) fn check_callable_against(&mut self, child: &TCallable, parent: &TAtomic) -> bool {
        match parent {
            TAtomic::Callable(parent_callable) => self.check_callable(child, parent_callable),
            TAtomic::Object if matches!(child.kind, CallableKind::Closure | CallableKind::Object) => {
                true
            }
            TAtomic::NamedObject(object)
                if child.kind == CallableKind::Closure
                    && object.type_params.is_empty()
                    && object.extra_types.is_empty()
                    && self.codebase.is_subtype_of("Closure", &object.name) =>
            {
                true
            }
            TAtomic::Array(_) | TAtomic::List(_) | TAtomic::KeyedArray(_) | TAtomic::Iterable(_)
                if child.kind == CallableKind::Array =>
            {
                self.check_atomic(&callable_array_shape(), parent)
            }
            _ => self.fail_pair(&TAtomic::Callable(child.clone()), parent),
        }
    }

    /// A non-callable atomic checked against a callable parent.
    pub(crate) fn check_against_callable(&mut self, child: &TAtomic, parent: &TCallable) -> bool {
        let accepted = match child {
            TAtomic::Literal(TLiteral::String(value)) => {
                accepts_any_callable(parent) && is_callable_string(value)
            }
            TAtomic::Scalar(TScalar::String(StringRefinement::Callable)) => {
                accepts_any_callable(parent)
            }
            TAtomic::NamedObject(object) => {
                matches!(parent.kind, CallableKind::Callable | CallableKind::Closure)
                    && parent.signature.is_none()
                    && !parent.is_pure
                    && self.codebase.is_subtype_of(&object.name, "Closure")
            }
            _ => false,
        };
        if accepted {
            return true;
        }
        self.fail_pair(child, &TAtomic::Callable(parent.clone()))
    }

    fn check_callable(&mut self, child: &TCallable, parent: &TCallable) -> bool {
        let kind_ok = match (child.kind, parent.kind) {
            (_, CallableKind::Callable) => true,
            (CallableKind::Closure, CallableKind::Closure)
            | (CallableKind::Array, CallableKind::Array)
            | (CallableKind::Object | CallableKind::Closure, CallableKind::Object) => true,
            _ => false,
        };
        if !kind_ok {
            return self.fail_pair(&TAtomic::Callable(child.clone()), &TAtomic::Callable(parent.clone()));
        }
        if parent.is_pure && !child.is_pure {
            return self.fail(|| ContainmentFailure::SignatureMismatch {
                detail: "an impure callable cannot be used where a pure one is expected".to_string(),
            });
        }

        match (&child.signature, &parent.signature) {
            (_, None) => true,
            (None, Some(_)) => self.fail(|| ContainmentFailure::SignatureMismatch {
                detail: "the callable signature is unknown".to_string(),
            }),
            (Some(child_sig), Some(parent_sig)) => self.check_signature(child_sig, parent_sig),
        }
    }

    fn check_signature(&mut self, child: &CallableSignature, parent: &CallableSignature) -> bool {
        let mixed = TUnion::mixed();

        for (index, parent_param) in parent.params.iter().enumerate() {
            let child_param = child
                .params
                .get(index)
                .or_else(|| child.params.last().filter(|param| param.is_variadic));
            let Some(child_param) = child_param else {
                // Extra arguments are ignored by the child.
                continue;
            };
            let parent_ty = parent_param.ty.as_ref().unwrap_or(&mixed);
            let child_ty = child_param.ty.as_ref().unwrap_or(&mixed);
            if !self.union_fits(parent_ty, child_ty) {
                return self.fail(|| ContainmentFailure::SignatureMismatch {
                    detail: format!(
                        "parameter #{} accepts {child_ty} but {parent_ty} may be passed",
                        index + 1
                    ),
                });
            }
        }

        if let Some((index, _)) = child
            .params
            .iter()
            .enumerate()
            .skip(parent.params.len())
            .find(|(_, param)| !param.is_optional && !param.is_variadic)
        {
            return self.fail(|| ContainmentFailure::SignatureMismatch {
                detail: format!("parameter #{} is required but never passed", index + 1),
            });
        }

        match (&child.return_type, &parent.return_type) {
            (_, None) => true,
            (None, Some(parent_return)) if parent_return.is_mixed() => true,
            (None, Some(parent_return)) => {
                let parent_return = parent_return.clone();
                self.fail(|| ContainmentFailure::SignatureMismatch {
                    detail: format!("return type is unknown, expected {parent_return}"),
                })
            }
            (Some(child_return), Some(parent_return)) => {
                if self.union_fits(child_return, parent_return) {
                    return true;
                }
                self.fail(|| ContainmentFailure::SignatureMismatch {
                    detail: format!("returns {child_return}, expected {parent_return}"),
                })
            }
        }
    }
}
