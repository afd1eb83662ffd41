//! Type serialization and stub generation.
//!
//! Projections of a resolved [`tyshape_solver::TUnion`] back into source:
//!
//! - **Native types** (`native`): parameter/return declarations for a
//!   [`NativeTarget`], with an exactness flag
//! - **Docblock tags** (`docblock`): precise types in annotation syntax
//! - **Literal expressions** (`literal`): default and constant values
//! - **Stub files** (`stubs`): one braced namespace block per namespace of a
//!   `Codebase`

pub mod docblock;
pub mod literal;
pub mod native;
pub mod stubs;
pub mod target;
mod writer;

pub use docblock::{DocTag, Docblock};
pub use literal::{UNKNOWN_VALUE_PLACEHOLDER, to_literal_expression};
pub use native::{
    NativeType, NativeTypePrinter, TypePosition, UnrepresentableTypeError, to_native_syntax,
};
pub use stubs::{StubGenerationError, StubGenerator, generate_stubs};
pub use target::{NativeTarget, TargetParseError};
