//! Type model and containment engine.
//!
//! This crate holds the semantic core every other phase depends on:
//!
//! - **Atomic catalog** (`types`): the closed set of elementary types
//! - **Union type** (`union`): deduplicated "one of" sets of atomics
//! - **Declaration registry** (`codebase`): immutable nominal lookups
//! - **Containment engine** (`subtype`, `subtype_rules`): "may a value of
//!   type A be used where B is expected"
//!
//! Types are plain owned values. After resolution they are never mutated;
//! template substitution builds new unions.

pub mod codebase;
pub mod diagnostics;
pub mod format;
pub mod instantiate;
pub mod refinement;
pub mod subtype;
mod subtype_rules;
pub mod types;
pub mod union;

pub use codebase::{
    ClassLikeKind, ClassLikeLookup, ClassLikeStorage, Codebase, CodebaseBuilder, ConstantStorage,
    FunctionLikeStorage, FunctionParamStorage, TemplateDecl,
};
pub use diagnostics::{
    CollectionPosition, ContainmentFailure, ContainmentTracer, DiagnosticTracer, FastTracer,
};
pub use format::TypeFormatter;
pub use instantiate::TemplateBindings;
pub use subtype::{ContainmentChecker, explain_containment, is_atomic_contained_by, is_contained_by};
pub use types::{
    ArrayKey, CallableKind, CallableParam, CallableSignature, ClassStringKind, ResourceKind,
    StringRefinement, TArray, TAtomic, TCallable, TEnumCase, TGenericParam, TInt, TIterable,
    TKeyedArray, TList, TLiteral, TNamedObject, TProperty, TScalar, Variance,
};
pub use union::{TUnion, UnionFlags};

#[cfg(test)]
#[path = "tests/concurrency_tests.rs"]
mod concurrency_tests;
