//! Nominal containment: named objects, intersections, type arguments with
//! declared variance, and enum cases.

use crate::diagnostics::{ContainmentFailure, ContainmentTracer};
use crate::subtype::{ContainmentChecker, explain_nested};
use crate::types::{TAtomic, TEnumCase, TNamedObject, Variance};
use crate::union::TUnion;

impl<T: ContainmentTracer> ContainmentChecker<'_, T> {
    pub(crate) fn check_named_object(&mut self, child: &TNamedObject, parent: &TNamedObject) -> bool {
        if !child.extra_types.is_empty() || !parent.extra_types.is_empty() {
            return self.check_intersection(child, parent);
        }

        if parent.is_static && !child.is_static {
            return self.fail(|| ContainmentFailure::NotASubclass {
                child: child.name.clone(),
                parent: "static".to_string(),
            });
        }

        if !self.codebase.is_subtype_of(&child.name, &parent.name) {
            return self.fail(|| ContainmentFailure::NotASubclass {
                child: child.name.clone(),
                parent: parent.name.clone(),
            });
        }

        self.check_type_arguments(child, parent)
    }

    /// Every part of the parent intersection needs some part of the child.
    fn check_intersection(&mut self, child: &TNamedObject, parent: &TNamedObject) -> bool {
        let child_parts = child.intersection_parts();
        for parent_part in parent.intersection_parts() {
            let satisfied = child_parts
                .iter()
                .any(|child_part| self.atomic_fits(child_part, &parent_part));
            if !satisfied {
                let child_id = TAtomic::NamedObject(child.clone()).get_id();
                let parent_id = parent_part.get_id();
                return self.fail(|| ContainmentFailure::NotASubclass {
                    child: child_id,
                    parent: parent_id,
                });
            }
        }
        true
    }

    /// Type arguments are compared positionally. A child written without
    /// arguments has `mixed` for each of them.
    fn check_type_arguments(&mut self, child: &TNamedObject, parent: &TNamedObject) -> bool {
        let mixed = TUnion::mixed();
        for (index, parent_param) in parent.type_params.iter().enumerate() {
            let child_param = child.type_params.get(index).unwrap_or(&mixed);
            let variance = self.codebase.generic_variance(&parent.name, index);
            let fits = match variance {
                Variance::Covariant => self.union_fits(child_param, parent_param),
                Variance::Contravariant => self.union_fits(parent_param, child_param),
                Variance::Invariant => {
                    self.union_fits(child_param, parent_param)
                        && self.union_fits(parent_param, child_param)
                }
            };
            if !fits {
                let (codebase, depth) = (self.codebase, self.depth);
                let class_name = parent.name.clone();
                return self.fail(|| ContainmentFailure::TypeArgumentMismatch {
                    class_name,
                    index,
                    nested: match variance {
                        Variance::Contravariant => {
                            explain_nested(codebase, depth, parent_param, child_param)
                        }
                        _ => explain_nested(codebase, depth, child_param, parent_param)
                            .or_else(|| explain_nested(codebase, depth, parent_param, child_param)),
                    },
                });
            }
        }
        true
    }

    /// An enum case is an instance of its enum and of everything the enum
    /// implements.
    pub(crate) fn check_enum_case_in_object(
        &mut self,
        child: &TEnumCase,
        parent: &TNamedObject,
    ) -> bool {
        if parent.is_static || !parent.type_params.is_empty() {
            return self.fail_pair(&TAtomic::EnumCase(child.clone()), &TAtomic::NamedObject(parent.clone()));
        }
        if !parent.extra_types.is_empty() {
            let enum_object = TAtomic::named(child.enum_name.clone());
            return parent
                .intersection_parts()
                .iter()
                .all(|part| self.atomic_fits(&enum_object, part))
                || self.fail_pair(&TAtomic::EnumCase(child.clone()), &TAtomic::NamedObject(parent.clone()));
        }
        if self.codebase.is_subtype_of(&child.enum_name, &parent.name) {
            return true;
        }
        self.fail(|| ContainmentFailure::NotASubclass {
            child: child.enum_name.clone(),
            parent: parent.name.clone(),
        })
    }
}
