//! tyshape: the type core of a PHP static analyzer.
//!
//! The workspace is split by phase:
//!
//! - [`common`] - byte spans, recursion limits, fully-qualified names
//! - [`solver`] - atomic and union types, the declaration registry and the
//!   containment engine
//! - [`parser`] - docblock type annotations to [`TUnion`]
//! - [`emitter`] - native declarations, literal defaults and stub files
//!
//! This crate re-exports the public surface of each and adds the `tyshape`
//! command-line tool.
//!
//! ```
//! use tyshape::{Codebase, ParserConfig, is_contained_by, parse_type};
//!
//! let config = ParserConfig::default();
//! let child = parse_type("non-empty-list<positive-int>", &config).unwrap();
//! let parent = parse_type("array<int, int>", &config).unwrap();
//! assert!(is_contained_by(&Codebase::empty(), &child, &parent));
//! ```

pub use tyshape_common as common;
pub use tyshape_emitter as emitter;
pub use tyshape_parser as parser;
pub use tyshape_solver as solver;

pub use tyshape_emitter::{
    NativeTarget, NativeType, NativeTypePrinter, StubGenerator, TypePosition,
    UnrepresentableTypeError, generate_stubs, to_literal_expression, to_native_syntax,
};
pub use tyshape_parser::{
    ParserConfig, TypeParseError, TypeParseErrorKind, TypeScope, parse_type, parse_type_in_scope,
};
pub use tyshape_solver::{
    ClassLikeLookup, Codebase, CodebaseBuilder, ContainmentFailure, TAtomic, TUnion,
    TypeFormatter, explain_containment, is_contained_by,
};

pub mod cli;
pub mod tracing_config;
