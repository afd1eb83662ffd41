//! Type-annotation parser.
//!
//! Turns annotation text such as `array{id: int, tags?: list<string>}|null`
//! into a [`TUnion`] in three steps:
//!
//! 1. `tokenizer` - words, literals and punctuation with byte spans
//! 2. `tree_builder` - recursive descent into a transient [`parse_tree`]
//! 3. `resolve` - bottom-up resolution against the reserved word table and
//!    the templates in scope
//!
//! Names are not looked up in any registry here. `Foo` becomes a named
//! object whether or not a class `Foo` exists.

pub mod config;
pub mod errors;
pub mod parse_tree;
pub mod reserved;
pub mod resolve;
pub mod tokenizer;
pub mod tree_builder;

pub use config::{ParserConfig, TypeScope};
pub use errors::{TypeParseError, TypeParseErrorKind};
pub use reserved::{GenericArity, ReservedWord, ReservedWordTable, SignatureSupport};

use tracing::trace;
use tyshape_solver::TUnion;

use crate::resolve::TypeResolver;
use crate::tree_builder::TreeBuilder;

/// Parse `text` with no templates in scope.
pub fn parse_type(text: &str, config: &ParserConfig) -> Result<TUnion, TypeParseError> {
    parse_type_in_scope(text, config, &TypeScope::default())
}

/// Parse `text` for a declaration described by `scope`.
pub fn parse_type_in_scope(
    text: &str,
    config: &ParserConfig,
    scope: &TypeScope,
) -> Result<TUnion, TypeParseError> {
    let tokens = tokenizer::tokenize(text)?;
    let tree = TreeBuilder::new(tokens)
        .with_max_depth(config.max_nesting_depth)
        .build()?;
    let union = TypeResolver::new(config, scope).resolve(&tree)?;
    trace!(text, resolved = %union, "parsed type");
    Ok(union)
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
