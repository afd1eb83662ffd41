//! Parse errors.
//!
//! Every error is attributable to one annotation. Callers degrade the
//! enclosing declaration to `mixed` and keep going.

use std::fmt;

use tyshape_common::ByteSpan;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeParseErrorKind {
    /// Structurally invalid token stream: unbalanced brackets, an empty union
    /// branch, a duplicate shape key, wrong generic arity.
    Syntax,
    /// A bare identifier that is neither a reserved word, a template in scope,
    /// nor shaped like a class name.
    UnknownType,
    /// Intersection of atomics that have no common structure.
    IncompatibleIntersection,
}

impl TypeParseErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeParseErrorKind::Syntax => "syntax error",
            TypeParseErrorKind::UnknownType => "unknown type",
            TypeParseErrorKind::IncompatibleIntersection => "incompatible intersection",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParseError {
    pub kind: TypeParseErrorKind,
    /// Innermost offending token.
    pub span: ByteSpan,
    pub message: String,
}

impl TypeParseError {
    pub fn syntax(span: ByteSpan, message: impl Into<String>) -> Self {
        TypeParseError {
            kind: TypeParseErrorKind::Syntax,
            span,
            message: message.into(),
        }
    }

    pub fn unknown_type(span: ByteSpan, message: impl Into<String>) -> Self {
        TypeParseError {
            kind: TypeParseErrorKind::UnknownType,
            span,
            message: message.into(),
        }
    }

    pub fn incompatible_intersection(span: ByteSpan, message: impl Into<String>) -> Self {
        TypeParseError {
            kind: TypeParseErrorKind::IncompatibleIntersection,
            span,
            message: message.into(),
        }
    }

    /// Byte offset of the error in the annotation text.
    pub fn offset(&self) -> u32 {
        self.span.start
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == TypeParseErrorKind::Syntax
    }
}

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at offset {}: {}",
            self.kind.as_str(),
            self.span.start,
            self.message
        )
    }
}

impl std::error::Error for TypeParseError {}
