//! Containment engine.
//!
//! `child` is contained by `parent` iff every atomic of `child` is contained
//! by at least one atomic of `parent`. Atomic pairs are dispatched to the
//! rule families in `subtype_rules`. Containment never fails with an error:
//! no matching rule is a definitive "not contained".
//!
//! Nested checks (collection parameters, shape properties, type arguments)
//! always run with a [`FastTracer`]; only the outermost mismatch is reported
//! to the caller's tracer, with the nested reason rebuilt lazily.

use tracing::{trace, warn};
use tyshape_common::limits::MAX_CONTAINMENT_DEPTH;

use crate::codebase::ClassLikeLookup;
use crate::diagnostics::{ContainmentFailure, ContainmentTracer, DiagnosticTracer, FastTracer};
use crate::types::{CallableKind, ResourceKind, StringRefinement, TAtomic, TLiteral, TScalar};
use crate::union::TUnion;

pub struct ContainmentChecker<'a, T: ContainmentTracer = FastTracer> {
    pub(crate) codebase: &'a dyn ClassLikeLookup,
    pub(crate) tracer: T,
    pub(crate) depth: u32,
}

impl<'a> ContainmentChecker<'a, FastTracer> {
    pub fn new(codebase: &'a dyn ClassLikeLookup) -> Self {
        ContainmentChecker {
            codebase,
            tracer: FastTracer,
            depth: 0,
        }
    }
}

impl<'a, T: ContainmentTracer> ContainmentChecker<'a, T> {
    pub fn with_tracer(codebase: &'a dyn ClassLikeLookup, tracer: T) -> Self {
        ContainmentChecker {
            codebase,
            tracer,
            depth: 0,
        }
    }

    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// A boolean-only checker one level deeper.
    pub(crate) fn nested(&self) -> ContainmentChecker<'a, FastTracer> {
        ContainmentChecker {
            codebase: self.codebase,
            tracer: FastTracer,
            depth: self.depth + 1,
        }
    }

    pub(crate) fn union_fits(&self, child: &TUnion, parent: &TUnion) -> bool {
        self.nested().check_union(child, parent)
    }

    pub(crate) fn atomic_fits(&self, child: &TAtomic, parent: &TAtomic) -> bool {
        self.nested().check_atomic(child, parent)
    }

    /// Report a mismatch and answer "not contained".
    pub(crate) fn fail(&mut self, reason: impl FnOnce() -> ContainmentFailure) -> bool {
        self.tracer.on_mismatch(reason);
        false
    }

    pub(crate) fn fail_pair(&mut self, child: &TAtomic, parent: &TAtomic) -> bool {
        self.fail(|| ContainmentFailure::NoMatchingAlternative {
            child: child.get_id(),
            parent: parent.get_id(),
        })
    }

    // =========================================================================
    // Unions
    // =========================================================================

    pub fn check_union(&mut self, child: &TUnion, parent: &TUnion) -> bool {
        if self.depth > MAX_CONTAINMENT_DEPTH {
            warn!(depth = self.depth, "containment depth limit exceeded");
            return self.fail(|| ContainmentFailure::DepthExceeded);
        }
        if parent.is_mixed() {
            return true;
        }

        for atomic in child {
            if !self.atomic_in_union(atomic, parent) {
                return false;
            }
        }
        true
    }

    /// Existential step: one alternative of `parent` must accept `child`.
    fn atomic_in_union(&mut self, child: &TAtomic, parent: &TUnion) -> bool {
        if child.is_never() {
            return true;
        }
        if parent.iter().any(|candidate| self.atomic_fits(child, candidate)) {
            return true;
        }

        if let Some(parts) = self.expand(child) {
            let mut nested = self.nested();
            if parts.iter().all(|part| nested.atomic_in_union(part, parent)) {
                trace!(child = %child, "contained after expansion");
                return true;
            }
        }

        // Re-run against the only plausible alternative to get a precise reason.
        let family = AtomicFamily::of(child);
        let mut candidates = parent
            .iter()
            .filter(|candidate| family.is_some() && AtomicFamily::of(candidate) == family);
        if let (Some(candidate), None) = (candidates.next(), candidates.next()) {
            return self.check_atomic(child, candidate);
        }

        self.fail(|| ContainmentFailure::NoMatchingAlternative {
            child: child.get_id(),
            parent: parent.get_id(),
        })
    }

    /// Split an atomic into alternatives that together cover it exactly.
    fn expand(&self, atomic: &TAtomic) -> Option<Vec<TAtomic>> {
        match atomic {
            TAtomic::Scalar(TScalar::Bool) => Some(vec![TAtomic::True, TAtomic::False]),
            TAtomic::Scalar(TScalar::ArrayKey) => Some(vec![TAtomic::int(), TAtomic::string()]),
            TAtomic::Scalar(TScalar::Numeric) => Some(vec![
                TAtomic::int(),
                TAtomic::float(),
                TAtomic::Scalar(TScalar::String(StringRefinement::Numeric)),
            ]),
            TAtomic::Scalar(TScalar::Scalar) => Some(vec![
                TAtomic::bool(),
                TAtomic::int(),
                TAtomic::float(),
                TAtomic::string(),
            ]),
            TAtomic::NamedObject(object)
                if object.type_params.is_empty() && object.extra_types.is_empty() =>
            {
                let cases = self.codebase.enum_cases(&object.name)?;
                if cases.is_empty() {
                    return None;
                }
                Some(
                    cases
                        .iter()
                        .map(|case| TAtomic::enum_case(object.name.clone(), case.clone()))
                        .collect(),
                )
            }
            TAtomic::GenericParam(param) => Some(param.as_type.types().to_vec()),
            _ => None,
        }
    }

    // =========================================================================
    // Atomic dispatch
    // =========================================================================

    pub fn check_atomic(&mut self, child: &TAtomic, parent: &TAtomic) -> bool {
        trace!(child = %child, parent = %parent, depth = self.depth, "check_atomic");

        match (child, parent) {
            (_, TAtomic::Mixed) | (TAtomic::Never, _) => true,
            (TAtomic::Mixed, _) => self.fail_pair(child, parent),

            (TAtomic::GenericParam(c), TAtomic::GenericParam(p))
                if c.name == p.name && c.defining_entity.eq_ignore_ascii_case(&p.defining_entity) =>
            {
                true
            }
            (TAtomic::GenericParam(c), _) => {
                let parent_union = TUnion::from_atomic(parent.clone());
                if self.union_fits(&c.as_type, &parent_union) {
                    return true;
                }
                self.fail_pair(child, parent)
            }
            (_, TAtomic::GenericParam(_)) => self.fail_pair(child, parent),

            (TAtomic::Null, TAtomic::Null)
            | (TAtomic::Void, TAtomic::Void)
            | (TAtomic::True, TAtomic::True)
            | (TAtomic::False, TAtomic::False)
            | (TAtomic::Object, TAtomic::Object)
            | (TAtomic::EmptyArray, TAtomic::EmptyArray) => true,
            (TAtomic::True | TAtomic::False, TAtomic::Scalar(TScalar::Bool | TScalar::Scalar)) => {
                true
            }

            (TAtomic::Scalar(c), TAtomic::Scalar(p)) => {
                if self.check_scalar(c, p) {
                    return true;
                }
                self.fail_pair(child, parent)
            }
            (TAtomic::Literal(c), TAtomic::Literal(p)) => {
                if literal_eq(c, p) {
                    return true;
                }
                self.fail_pair(child, parent)
            }
            (TAtomic::Literal(c), TAtomic::Scalar(p)) => {
                if self.check_literal_in_scalar(c, p) {
                    return true;
                }
                self.fail_pair(child, parent)
            }

            (TAtomic::EmptyArray, _) => self.check_empty_array(parent),
            (
                TAtomic::Array(_) | TAtomic::List(_) | TAtomic::KeyedArray(_),
                TAtomic::Array(_) | TAtomic::List(_) | TAtomic::KeyedArray(_) | TAtomic::Iterable(_),
            ) => self.check_array_like(child, parent),
            (TAtomic::Iterable(c), TAtomic::Iterable(p)) => self.check_iterable(c, p),
            (TAtomic::NamedObject(c), TAtomic::Iterable(p)) => self.check_traversable(c, p),

            (TAtomic::NamedObject(_) | TAtomic::EnumCase(_), TAtomic::Object) => true,
            (TAtomic::NamedObject(c), TAtomic::NamedObject(p)) => self.check_named_object(c, p),
            (TAtomic::EnumCase(c), TAtomic::NamedObject(p)) => self.check_enum_case_in_object(c, p),
            (TAtomic::EnumCase(c), TAtomic::EnumCase(p)) => {
                if c.enum_name.eq_ignore_ascii_case(&p.enum_name) && c.case_name == p.case_name {
                    return true;
                }
                self.fail_pair(child, parent)
            }

            (TAtomic::Callable(c), _) => self.check_callable_against(c, parent),
            (_, TAtomic::Callable(p)) => self.check_against_callable(child, p),

            (TAtomic::Resource(c), TAtomic::Resource(p)) => {
                if p == c || *p == ResourceKind::Any {
                    return true;
                }
                self.fail_pair(child, parent)
            }

            _ => {
                if child == parent {
                    return true;
                }
                self.fail_pair(child, parent)
            }
        }
    }
}

fn literal_eq(child: &TLiteral, parent: &TLiteral) -> bool {
    match (child, parent) {
        (TLiteral::ClassString(c), TLiteral::ClassString(p)) => {
            c.trim_start_matches('\\').eq_ignore_ascii_case(p.trim_start_matches('\\'))
        }
        _ => child == parent,
    }
}

/// Coarse grouping used to pick the alternative worth explaining.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AtomicFamily {
    Collection,
    Object,
    Callable,
}

impl AtomicFamily {
    fn of(atomic: &TAtomic) -> Option<AtomicFamily> {
        match atomic {
            TAtomic::Array(_)
            | TAtomic::List(_)
            | TAtomic::KeyedArray(_)
            | TAtomic::EmptyArray
            | TAtomic::Iterable(_) => Some(AtomicFamily::Collection),
            TAtomic::Object | TAtomic::NamedObject(_) | TAtomic::EnumCase(_) => {
                Some(AtomicFamily::Object)
            }
            TAtomic::Callable(callable) if callable.kind == CallableKind::Array => {
                Some(AtomicFamily::Collection)
            }
            TAtomic::Callable(_) => Some(AtomicFamily::Callable),
            _ => None,
        }
    }
}

/// Nested failure reason for a union pair, computed only on demand.
pub(crate) fn explain_nested(
    codebase: &dyn ClassLikeLookup,
    depth: u32,
    child: &TUnion,
    parent: &TUnion,
) -> Option<Box<ContainmentFailure>> {
    let mut checker = ContainmentChecker {
        codebase,
        tracer: DiagnosticTracer::new(),
        depth: depth + 1,
    };
    if checker.check_union(child, parent) {
        return None;
    }
    checker.tracer.take_failure().map(Box::new)
}

// =============================================================================
// Entry points
// =============================================================================

/// Whether a value of type `child` may be used where `parent` is expected.
pub fn is_contained_by(codebase: &dyn ClassLikeLookup, child: &TUnion, parent: &TUnion) -> bool {
    ContainmentChecker::new(codebase).check_union(child, parent)
}

/// Atomic-level containment, without union expansion.
pub fn is_atomic_contained_by(
    codebase: &dyn ClassLikeLookup,
    child: &TAtomic,
    parent: &TAtomic,
) -> bool {
    ContainmentChecker::new(codebase).check_atomic(child, parent)
}

/// The first reason `child` is not contained by `parent`, or `None` when it is.
pub fn explain_containment(
    codebase: &dyn ClassLikeLookup,
    child: &TUnion,
    parent: &TUnion,
) -> Option<ContainmentFailure> {
    let mut checker = ContainmentChecker::with_tracer(codebase, DiagnosticTracer::new());
    if checker.check_union(child, parent) {
        return None;
    }
    let failure = checker.into_tracer().take_failure();
    Some(failure.unwrap_or_else(|| ContainmentFailure::NoMatchingAlternative {
        child: child.get_id(),
        parent: parent.get_id(),
    }))
}

#[cfg(test)]
#[path = "tests/subtype_tests.rs"]
mod tests;
