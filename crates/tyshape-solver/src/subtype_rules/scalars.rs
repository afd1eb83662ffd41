//! Scalar and literal containment.
//!
//! Covers the scalar lattice (`scalar` ⊇ `array-key` ⊇ `int|string`,
//! `numeric` ⊇ `int|float|numeric-string`), integer ranges, string
//! refinements and literal values checked against refinement predicates.

use crate::codebase::ClassLikeKind;
use crate::diagnostics::ContainmentTracer;
use crate::refinement::{
    class_literal_satisfies, is_numeric_string, is_refinement_contained_by, literal_satisfies,
};
use crate::subtype::ContainmentChecker;
use crate::types::{ClassStringKind, StringRefinement, TAtomic, TLiteral, TScalar};
use crate::union::TUnion;

impl<T: ContainmentTracer> ContainmentChecker<'_, T> {
    pub(crate) fn check_scalar(&mut self, child: &TScalar, parent: &TScalar) -> bool {
        match (child, parent) {
            (_, TScalar::Scalar) => true,
            (
                TScalar::Int(_)
                | TScalar::LiteralInt
                | TScalar::String(_)
                | TScalar::ClassString { .. }
                | TScalar::ArrayKey,
                TScalar::ArrayKey,
            ) => true,
            (
                TScalar::Int(_)
                | TScalar::LiteralInt
                | TScalar::Float
                | TScalar::Numeric
                | TScalar::String(StringRefinement::Numeric),
                TScalar::Numeric,
            ) => true,
            (TScalar::Bool, TScalar::Bool) | (TScalar::Float, TScalar::Float) => true,
            (TScalar::Int(child_range), TScalar::Int(parent_range)) => {
                parent_range.contains_range(child_range)
            }
            (TScalar::LiteralInt, TScalar::Int(parent_range)) => parent_range.is_unbounded(),
            (TScalar::LiteralInt, TScalar::LiteralInt) => true,
            (
                TScalar::ClassString {
                    kind: child_kind,
                    bound: child_bound,
                },
                TScalar::ClassString {
                    kind: parent_kind,
                    bound: parent_bound,
                },
            ) => {
                if !is_refinement_contained_by(child_kind.refinement(), parent_kind.refinement()) {
                    return false;
                }
                match (child_bound, parent_bound) {
                    (_, None) => true,
                    (None, Some(_)) => false,
                    (Some(child_bound), Some(parent_bound)) => {
                        self.atomic_fits(child_bound, parent_bound)
                    }
                }
            }
            (TScalar::String(_) | TScalar::ClassString { .. }, TScalar::String(parent_refinement)) => {
                child
                    .string_refinement()
                    .is_some_and(|refinement| is_refinement_contained_by(refinement, *parent_refinement))
            }
            _ => false,
        }
    }

    pub(crate) fn check_literal_in_scalar(&mut self, literal: &TLiteral, parent: &TScalar) -> bool {
        match (literal, parent) {
            (_, TScalar::Scalar) => true,
            (TLiteral::Int(value), TScalar::Int(range)) => range.contains_value(*value),
            (TLiteral::Int(_), TScalar::LiteralInt | TScalar::ArrayKey | TScalar::Numeric) => true,
            (TLiteral::Float(_), TScalar::Float | TScalar::Numeric) => true,
            (TLiteral::String(value), TScalar::String(refinement)) => {
                literal_satisfies(value, *refinement)
            }
            (TLiteral::String(_), TScalar::ArrayKey) => true,
            (TLiteral::String(value), TScalar::Numeric) => is_numeric_string(value),
            (TLiteral::ClassString(_), TScalar::String(refinement)) => {
                class_literal_satisfies(*refinement)
            }
            (TLiteral::ClassString(_), TScalar::ArrayKey) => true,
            (TLiteral::ClassString(name), TScalar::ClassString { kind, bound }) => {
                self.class_literal_in_class_string(name, *kind, bound.as_deref())
            }
            _ => false,
        }
    }

    fn class_literal_in_class_string(
        &mut self,
        name: &str,
        kind: ClassStringKind,
        bound: Option<&TAtomic>,
    ) -> bool {
        let declared_kind = self.codebase.kind(name);
        let kind_ok = match kind {
            ClassStringKind::Class => true,
            ClassStringKind::Interface => declared_kind == Some(ClassLikeKind::Interface),
            ClassStringKind::Enum => declared_kind == Some(ClassLikeKind::Enum),
            ClassStringKind::Trait => declared_kind == Some(ClassLikeKind::Trait),
        };
        if !kind_ok {
            return false;
        }

        match bound {
            None => true,
            Some(TAtomic::NamedObject(bound)) => self.codebase.is_subtype_of(name, &bound.name),
            Some(TAtomic::GenericParam(param)) => {
                let object = TUnion::from_atomic(TAtomic::named(name));
                self.union_fits(&object, &param.as_type)
            }
            Some(other) => self.atomic_fits(&TAtomic::named(name), other),
        }
    }
}
