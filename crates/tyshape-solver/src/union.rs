//! Union type: "one of" a deduplicated set of atomics.
//!
//! A finalized `TUnion` is never empty. Construction normalizes:
//! - `never` disappears next to anything else (an empty input becomes `never`)
//! - `mixed` absorbs every other member
//! - structurally identical atomics collapse
//! - `true|false` collapses to `bool`, and `bool` absorbs `true`/`false`
//!
//! Equality ignores member order and flags.

use bitflags::bitflags;
use std::fmt;

use crate::instantiate::TemplateBindings;
use crate::types::{TAtomic, TScalar};

bitflags! {
    /// Per-union metadata that does not change the set of values.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct UnionFlags: u8 {
        /// Written with a leading `?` (`?int`).
        const EXPLICIT_NULLABLE = 1 << 0;
        /// Produced as a `mixed` stand-in after an annotation failed to resolve.
        const FAILED_RESOLUTION = 1 << 1;
    }
}

#[derive(Clone, Debug)]
pub struct TUnion {
    types: Vec<TAtomic>,
    flags: UnionFlags,
}

impl TUnion {
    pub fn new(types: Vec<TAtomic>) -> Self {
        TUnion {
            types: normalize(types),
            flags: UnionFlags::empty(),
        }
    }

    pub fn from_atomic(atomic: TAtomic) -> Self {
        TUnion {
            types: vec![atomic],
            flags: UnionFlags::empty(),
        }
    }

    pub fn mixed() -> Self {
        TUnion::from_atomic(TAtomic::Mixed)
    }

    pub fn never() -> Self {
        TUnion::from_atomic(TAtomic::Never)
    }

    pub fn null() -> Self {
        TUnion::from_atomic(TAtomic::Null)
    }

    pub fn int() -> Self {
        TUnion::from_atomic(TAtomic::int())
    }

    pub fn string() -> Self {
        TUnion::from_atomic(TAtomic::string())
    }

    pub fn array_key() -> Self {
        TUnion::from_atomic(TAtomic::array_key())
    }

    /// `mixed` marking an annotation that could not be resolved.
    pub fn failed_resolution() -> Self {
        TUnion::mixed().with_flags(UnionFlags::FAILED_RESOLUTION)
    }

    pub fn with_flags(mut self, flags: UnionFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn flags(&self) -> UnionFlags {
        self.flags
    }

    pub fn types(&self) -> &[TAtomic] {
        &self.types
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TAtomic> {
        self.types.iter()
    }

    pub fn into_types(self) -> Vec<TAtomic> {
        self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false for a finalized union; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.types.len() == 1
    }

    pub fn get_single(&self) -> Option<&TAtomic> {
        match self.types.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self.types.as_slice(), [TAtomic::Mixed])
    }

    pub fn is_never(&self) -> bool {
        matches!(self.types.as_slice(), [TAtomic::Never])
    }

    /// Contains `null` or a null-like atomic (`void`).
    pub fn is_nullable(&self) -> bool {
        self.types.iter().any(TAtomic::is_null_like)
    }

    pub fn is_explicit_nullable(&self) -> bool {
        self.flags.contains(UnionFlags::EXPLICIT_NULLABLE)
    }

    pub fn is_failed_resolution(&self) -> bool {
        self.flags.contains(UnionFlags::FAILED_RESOLUTION)
    }

    pub fn has_template(&self) -> bool {
        self.types.iter().any(TAtomic::has_template)
    }

    pub fn contains(&self, atomic: &TAtomic) -> bool {
        self.types.contains(atomic)
    }

    /// A new union with `null` added.
    pub fn as_nullable(&self) -> TUnion {
        let mut types = self.types.clone();
        types.push(TAtomic::Null);
        TUnion {
            types: normalize(types),
            flags: self.flags,
        }
    }

    /// A new union with null-like members removed.
    ///
    /// Returns `never` when the union was only `null`.
    pub fn without_null(&self) -> TUnion {
        let types = self
            .types
            .iter()
            .filter(|atomic| !atomic.is_null_like())
            .cloned()
            .collect();
        TUnion {
            types: normalize(types),
            flags: self.flags - UnionFlags::EXPLICIT_NULLABLE,
        }
    }

    /// Union of both member sets.
    pub fn combine(&self, other: &TUnion) -> TUnion {
        let mut types = self.types.clone();
        types.extend(other.types.iter().cloned());
        TUnion {
            types: normalize(types),
            flags: self.flags | other.flags,
        }
    }

    /// Substitute bound template parameters, producing a new union.
    pub fn replace_templates(&self, bindings: &TemplateBindings) -> TUnion {
        crate::instantiate::replace_templates(self, bindings)
    }

    /// Canonical identity: member ids sorted and joined with `|`.
    pub fn get_id(&self) -> String {
        let mut ids: Vec<String> = self.types.iter().map(TAtomic::get_id).collect();
        ids.sort_unstable();
        ids.join("|")
    }
}

impl From<TAtomic> for TUnion {
    fn from(atomic: TAtomic) -> Self {
        TUnion::from_atomic(atomic)
    }
}

impl FromIterator<TAtomic> for TUnion {
    fn from_iter<I: IntoIterator<Item = TAtomic>>(iter: I) -> Self {
        TUnion::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TUnion {
    type Item = &'a TAtomic;
    type IntoIter = std::slice::Iter<'a, TAtomic>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

impl PartialEq for TUnion {
    fn eq(&self, other: &Self) -> bool {
        self.types.len() == other.types.len()
            && self.types.iter().all(|atomic| other.types.contains(atomic))
    }
}

impl Eq for TUnion {}

impl fmt::Display for TUnion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::TypeFormatter::new().format_union(self))
    }
}

fn normalize(types: Vec<TAtomic>) -> Vec<TAtomic> {
    if types.iter().any(TAtomic::is_mixed) {
        return vec![TAtomic::Mixed];
    }

    let mut out: Vec<TAtomic> = Vec::with_capacity(types.len());
    for atomic in types {
        if atomic.is_never() || out.contains(&atomic) {
            continue;
        }
        out.push(atomic);
    }

    let bool_atomic = TAtomic::Scalar(TScalar::Bool);
    let has_bool = out.contains(&bool_atomic);
    let has_true = out.contains(&TAtomic::True);
    let has_false = out.contains(&TAtomic::False);
    if has_bool || (has_true && has_false) {
        out.retain(|atomic| !matches!(atomic, TAtomic::True | TAtomic::False));
        if !has_bool {
            out.push(bool_atomic);
        }
    }

    if out.is_empty() {
        out.push(TAtomic::Never);
    }
    out
}

#[cfg(test)]
#[path = "tests/union_tests.rs"]
mod tests;
