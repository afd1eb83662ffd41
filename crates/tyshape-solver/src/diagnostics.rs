//! Containment failure reasons and tracers.
//!
//! The containment rules report mismatches through a [`ContainmentTracer`].
//! `FastTracer` stops at the first mismatch without building anything;
//! `DiagnosticTracer` keeps the first [`ContainmentFailure`] for
//! [`explain_containment`](crate::explain_containment).

use std::fmt;

use crate::types::ArrayKey;

/// Why a child type is not contained by a parent type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainmentFailure {
    /// No alternative of the parent accepts this child atomic.
    NoMatchingAlternative { child: String, parent: String },
    /// A required key of the parent shape is absent from the child.
    MissingRequiredKey { key: ArrayKey },
    /// The child has a key that a sealed parent shape does not declare.
    UnexpectedKey { key: ArrayKey },
    /// The child has open entries (`...`) but the parent shape is sealed.
    OpenShapeIntoSealed,
    /// A list is required but the child shape is not positional.
    NotAList,
    /// A non-empty collection is required.
    PossiblyEmpty,
    /// A shape property exists on both sides but its type does not fit.
    PropertyTypeMismatch {
        key: ArrayKey,
        nested: Option<Box<ContainmentFailure>>,
    },
    /// A collection key or value type does not fit.
    CollectionParamMismatch {
        position: CollectionPosition,
        nested: Option<Box<ContainmentFailure>>,
    },
    /// The child class-like does not extend or implement the parent.
    NotASubclass { child: String, parent: String },
    /// A class type argument violates the declared variance.
    TypeArgumentMismatch {
        class_name: String,
        index: usize,
        nested: Option<Box<ContainmentFailure>>,
    },
    /// Callable parameter or return type mismatch.
    SignatureMismatch { detail: String },
    /// The query nested deeper than the containment depth limit.
    DepthExceeded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionPosition {
    Key,
    Value,
}

impl fmt::Display for CollectionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionPosition::Key => f.write_str("key"),
            CollectionPosition::Value => f.write_str("value"),
        }
    }
}

impl fmt::Display for ContainmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainmentFailure::NoMatchingAlternative { child, parent } => {
                write!(f, "{child} is not contained by {parent}")
            }
            ContainmentFailure::MissingRequiredKey { key } => {
                write!(f, "required key '{key}' is missing")
            }
            ContainmentFailure::UnexpectedKey { key } => {
                write!(f, "key '{key}' is not allowed by the sealed shape")
            }
            ContainmentFailure::OpenShapeIntoSealed => {
                f.write_str("an open shape cannot be used where a sealed shape is expected")
            }
            ContainmentFailure::NotAList => f.write_str("a list is expected"),
            ContainmentFailure::PossiblyEmpty => {
                f.write_str("a possibly empty collection cannot be used where a non-empty one is expected")
            }
            ContainmentFailure::PropertyTypeMismatch { key, nested } => {
                write!(f, "type of key '{key}' does not match")?;
                write_nested(f, nested)
            }
            ContainmentFailure::CollectionParamMismatch { position, nested } => {
                write!(f, "collection {position} type does not match")?;
                write_nested(f, nested)
            }
            ContainmentFailure::NotASubclass { child, parent } => {
                write!(f, "{child} does not extend or implement {parent}")
            }
            ContainmentFailure::TypeArgumentMismatch {
                class_name,
                index,
                nested,
            } => {
                write!(f, "type argument #{} of {class_name} does not match", index + 1)?;
                write_nested(f, nested)
            }
            ContainmentFailure::SignatureMismatch { detail } => {
                write!(f, "callable signature mismatch: {detail}")
            }
            ContainmentFailure::DepthExceeded => f.write_str("type is nested too deeply"),
        }
    }
}

fn write_nested(
    f: &mut fmt::Formatter<'_>,
    nested: &Option<Box<ContainmentFailure>>,
) -> fmt::Result {
    match nested {
        Some(nested) => write!(f, ": {nested}"),
        None => Ok(()),
    }
}

/// Receives mismatches discovered by the containment rules.
pub trait ContainmentTracer {
    /// Called on a mismatch. `reason` is only invoked when the tracer keeps it.
    fn on_mismatch(&mut self, reason: impl FnOnce() -> ContainmentFailure);
}

/// Boolean-only tracer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FastTracer;

impl ContainmentTracer for FastTracer {
    #[inline(always)]
    fn on_mismatch(&mut self, _reason: impl FnOnce() -> ContainmentFailure) {}
}

/// Keeps the first failure reason.
#[derive(Debug, Default)]
pub struct DiagnosticTracer {
    failure: Option<ContainmentFailure>,
}

impl DiagnosticTracer {
    pub fn new() -> Self {
        Self { failure: None }
    }

    pub fn take_failure(&mut self) -> Option<ContainmentFailure> {
        self.failure.take()
    }

    pub fn has_failure(&self) -> bool {
        self.failure.is_some()
    }
}

impl ContainmentTracer for DiagnosticTracer {
    fn on_mismatch(&mut self, reason: impl FnOnce() -> ContainmentFailure) {
        if self.failure.is_none() {
            self.failure = Some(reason());
        }
    }
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod tests;
